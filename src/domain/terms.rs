// ==========================================
// 全球服务价格手册与报价系统 - 商务条款单例
// ==========================================
// 职责: 费率与乘数常量, 每次报价读取, 报价路径绝不修改
// 缺省值: 记录或字段缺失时由 Default 兜底
// ==========================================

use serde::{Deserialize, Serialize};

/// 服务管理费缺省百分比
pub const DEFAULT_SERVICE_MANAGEMENT_FEE_PCT: f64 = 5.0;
/// 差旅费缺省单价 (每公里)
pub const DEFAULT_TRAVEL_CHARGE_PER_KM: f64 = 0.4;
/// 差旅费起征里程 (公里)
pub const DEFAULT_TRAVEL_THRESHOLD_KM: f64 = 50.0;
/// 非工作时段乘数
pub const DEFAULT_OUT_OF_HOURS_MULTIPLIER: f64 = 1.5;
/// 周末/节假日乘数
pub const DEFAULT_WEEKEND_HOLIDAY_MULTIPLIER: f64 = 2.0;

// ==========================================
// TermsConditions - 商务条款记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsConditions {
    #[serde(default = "default_fee_pct")]
    pub service_management_fee_pct: f64,
    #[serde(default = "default_travel_per_km")]
    pub travel_charge_per_km: f64,
    #[serde(default = "default_travel_threshold")]
    pub travel_threshold_km: f64,
    #[serde(default = "default_ooh_multiplier")]
    pub out_of_hours_multiplier: f64,
    #[serde(default = "default_weekend_multiplier")]
    pub weekend_holiday_multiplier: f64,
}

fn default_fee_pct() -> f64 {
    DEFAULT_SERVICE_MANAGEMENT_FEE_PCT
}
fn default_travel_per_km() -> f64 {
    DEFAULT_TRAVEL_CHARGE_PER_KM
}
fn default_travel_threshold() -> f64 {
    DEFAULT_TRAVEL_THRESHOLD_KM
}
fn default_ooh_multiplier() -> f64 {
    DEFAULT_OUT_OF_HOURS_MULTIPLIER
}
fn default_weekend_multiplier() -> f64 {
    DEFAULT_WEEKEND_HOLIDAY_MULTIPLIER
}

impl Default for TermsConditions {
    fn default() -> Self {
        Self {
            service_management_fee_pct: DEFAULT_SERVICE_MANAGEMENT_FEE_PCT,
            travel_charge_per_km: DEFAULT_TRAVEL_CHARGE_PER_KM,
            travel_threshold_km: DEFAULT_TRAVEL_THRESHOLD_KM,
            out_of_hours_multiplier: DEFAULT_OUT_OF_HOURS_MULTIPLIER,
            weekend_holiday_multiplier: DEFAULT_WEEKEND_HOLIDAY_MULTIPLIER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let terms = TermsConditions::default();
        assert_eq!(terms.service_management_fee_pct, 5.0);
        assert_eq!(terms.travel_charge_per_km, 0.4);
        assert_eq!(terms.travel_threshold_km, 50.0);
        assert_eq!(terms.out_of_hours_multiplier, 1.5);
        assert_eq!(terms.weekend_holiday_multiplier, 2.0);
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        // 字段缺失时按缺省值补齐
        let terms: TermsConditions =
            serde_json::from_str(r#"{"service_management_fee_pct": 8.0}"#).unwrap();
        assert_eq!(terms.service_management_fee_pct, 8.0);
        assert_eq!(terms.travel_threshold_km, 50.0);
        assert_eq!(terms.weekend_holiday_multiplier, 2.0);
    }
}
