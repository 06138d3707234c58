// ==========================================
// 全球服务价格手册与报价系统 - 领域类型定义
// ==========================================
// 职责: 服务级别 / 服务类型 / SLA 响应档 的封闭枚举
// 序列化格式: 与价格表原始表头一致的业务编码
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 服务级别 (Service Level)
// ==========================================
// L1(基础) 至 L5(架构/规划), 等级制
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ServiceLevel {
    L1,
    L2,
    L3,
    L4,
    L5,
}

impl ServiceLevel {
    /// 全部级别, 按 L1..L5 排序
    pub const ALL: [ServiceLevel; 5] = [
        ServiceLevel::L1,
        ServiceLevel::L2,
        ServiceLevel::L3,
        ServiceLevel::L4,
        ServiceLevel::L5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceLevel::L1 => "L1",
            ServiceLevel::L2 => "L2",
            ServiceLevel::L3 => "L3",
            ServiceLevel::L4 => "L4",
            ServiceLevel::L5 => "L5",
        }
    }

    /// 解析级别标记 (去空白 + 大写后匹配, 与表头单元格口径一致)
    pub fn parse(value: &str) -> Option<ServiceLevel> {
        let normalized: String = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        match normalized.as_str() {
            "L1" => Some(ServiceLevel::L1),
            "L2" => Some(ServiceLevel::L2),
            "L3" => Some(ServiceLevel::L3),
            "L4" => Some(ServiceLevel::L4),
            "L5" => Some(ServiceLevel::L5),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 服务类型 (Service Type)
// ==========================================
// 计费单元: 全天上门 / 半天上门 / 派单工单
// 业务编码与原始价格表表头一致 (入库/查询均使用该编码)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    FullDayVisit,
    HalfDayVisit,
    DispatchTicket,
}

impl ServiceType {
    /// 全部类型, 按价格表波段顺序排列
    pub const ALL: [ServiceType; 3] = [
        ServiceType::FullDayVisit,
        ServiceType::HalfDayVisit,
        ServiceType::DispatchTicket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::FullDayVisit => "Full Day Visit (8hrs)",
            ServiceType::HalfDayVisit => "Half Day Visit (4hrs)",
            ServiceType::DispatchTicket => "Dispatch Ticket",
        }
    }

    pub fn parse(value: &str) -> Option<ServiceType> {
        match value.trim() {
            "Full Day Visit (8hrs)" => Some(ServiceType::FullDayVisit),
            "Half Day Visit (4hrs)" => Some(ServiceType::HalfDayVisit),
            "Dispatch Ticket" => Some(ServiceType::DispatchTicket),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// SLA 响应档 (SLA Band)
// ==========================================
// 事件响应时效档位, 每档独立可选报价
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlaBand {
    NineFiveFour,      // 9x5x4
    TwentyFourSeven,   // 24x7x4
    Sbd,               // 当日解决
    Nbd,               // 次日解决
    TwoBd,             // 2 个工作日
    ThreeBd,           // 3 个工作日
    FourBd,            // 4 个工作日
    AdditionalHour,    // 超时附加小时
}

impl SlaBand {
    /// 全部档位, 按原始价格表列顺序排列
    pub const ALL: [SlaBand; 8] = [
        SlaBand::NineFiveFour,
        SlaBand::TwentyFourSeven,
        SlaBand::Sbd,
        SlaBand::Nbd,
        SlaBand::TwoBd,
        SlaBand::ThreeBd,
        SlaBand::FourBd,
        SlaBand::AdditionalHour,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlaBand::NineFiveFour => "9x5x4",
            SlaBand::TwentyFourSeven => "24x7x4",
            SlaBand::Sbd => "SBD",
            SlaBand::Nbd => "NBD",
            SlaBand::TwoBd => "2BD",
            SlaBand::ThreeBd => "3BD",
            SlaBand::FourBd => "4BD",
            SlaBand::AdditionalHour => "AdditionalHour",
        }
    }
}

impl fmt::Display for SlaBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_level_parse_normalizes() {
        assert_eq!(ServiceLevel::parse("L1"), Some(ServiceLevel::L1));
        assert_eq!(ServiceLevel::parse(" l3 "), Some(ServiceLevel::L3));
        assert_eq!(ServiceLevel::parse("L 5"), Some(ServiceLevel::L5));
        assert_eq!(ServiceLevel::parse("L6"), None);
        assert_eq!(ServiceLevel::parse(""), None);
    }

    #[test]
    fn test_service_type_roundtrip() {
        for st in ServiceType::ALL {
            assert_eq!(ServiceType::parse(st.as_str()), Some(st));
        }
        assert_eq!(ServiceType::parse("Full Day"), None);
    }

    #[test]
    fn test_band_order_matches_sheet() {
        assert_eq!(SlaBand::ALL[0].as_str(), "9x5x4");
        assert_eq!(SlaBand::ALL[7].as_str(), "AdditionalHour");
    }
}
