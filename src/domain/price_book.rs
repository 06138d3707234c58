// ==========================================
// 全球服务价格手册与报价系统 - 价格手册领域模型
// ==========================================
// 职责: 标准化价格条目 / SLA 档报价 / 导入与审计报告结构
// 红线: base_rate 缺失即组合未定价, 不生成条目 (绝不以 0 兜底)
// ==========================================

use crate::domain::types::{ServiceLevel, ServiceType, SlaBand};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// IncidentRates - 按 SLA 响应档的可选报价
// ==========================================
// 每档独立解析, 独立可缺失
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentRates {
    pub nine_five_four: Option<f64>,
    pub twenty_four_seven: Option<f64>,
    pub sbd: Option<f64>,
    pub nbd: Option<f64>,
    pub two_bd: Option<f64>,
    pub three_bd: Option<f64>,
    pub four_bd: Option<f64>,
    pub additional_hour: Option<f64>,
}

impl IncidentRates {
    pub fn get(&self, band: SlaBand) -> Option<f64> {
        match band {
            SlaBand::NineFiveFour => self.nine_five_four,
            SlaBand::TwentyFourSeven => self.twenty_four_seven,
            SlaBand::Sbd => self.sbd,
            SlaBand::Nbd => self.nbd,
            SlaBand::TwoBd => self.two_bd,
            SlaBand::ThreeBd => self.three_bd,
            SlaBand::FourBd => self.four_bd,
            SlaBand::AdditionalHour => self.additional_hour,
        }
    }

    pub fn set(&mut self, band: SlaBand, value: Option<f64>) {
        match band {
            SlaBand::NineFiveFour => self.nine_five_four = value,
            SlaBand::TwentyFourSeven => self.twenty_four_seven = value,
            SlaBand::Sbd => self.sbd = value,
            SlaBand::Nbd => self.nbd = value,
            SlaBand::TwoBd => self.two_bd = value,
            SlaBand::ThreeBd => self.three_bd = value,
            SlaBand::FourBd => self.four_bd = value,
            SlaBand::AdditionalHour => self.additional_hour = value,
        }
    }
}

// ==========================================
// PriceBookEntry - 标准化价格条目
// ==========================================
// 用途: 导入层批量写入, 报价引擎只读
// 自然键: (country, level, service_type); supplier 维度不保证唯一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBookEntry {
    // ===== 主键 =====
    pub entry_id: String, // 条目唯一标识 (UUID)

    // ===== 身份字段 =====
    pub region: String,
    pub country: String,
    pub supplier: String,      // 缺省 "Direct"
    pub currency: String,      // 缺省空串, 由审计层报告
    pub payment_terms: String, // 缺省空串, 由审计层报告

    // ===== 计费维度 =====
    pub level: ServiceLevel,
    pub service_type: ServiceType,
    pub base_rate: f64, // 必填正数

    // ===== SLA 档报价 =====
    pub incident_rates: IncidentRates,
    pub additional_hour_rate: Option<f64>, // AdditionalHour 档的便捷副本

    // ===== 审计字段 =====
    pub batch_id: String, // 产生该条目的导入批次
    pub created_at: DateTime<Utc>,
}

impl PriceBookEntry {
    /// 身份 + 报价的比较键 (不含 UUID/时间戳), 用于幂等性判断
    pub fn content_key(&self) -> (String, String, String, &'static str, &'static str, String) {
        (
            self.region.clone(),
            self.country.clone(),
            self.supplier.clone(),
            self.level.as_str(),
            self.service_type.as_str(),
            format!("{:.4}", self.base_rate),
        )
    }
}

// ==========================================
// StructuralIssue - 结构性审计发现
// ==========================================
// 审计发现只收集, 不中断 (报告而非异常)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralIssue {
    pub country: Option<String>,
    pub field: String,
    pub message: String,
}

impl StructuralIssue {
    pub fn global(field: &str, message: impl Into<String>) -> Self {
        Self {
            country: None,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn for_country(country: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            country: Some(country.to_string()),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ==========================================
// ValidationReport - 价格手册审计报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_entries: usize,
    pub region_count: usize,
    pub country_count: usize,
    pub issue_count: usize,
    /// 发现列表 (上限 MAX_REPORTED_ISSUES, 超出部分仅计数)
    pub issues: Vec<StructuralIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issue_count == 0
    }
}

// ==========================================
// LayoutDrift - 启发式与静态布局的分歧记录
// ==========================================
// 两侧均有结论且不一致时记录, 用于暴露表格布局漂移
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDrift {
    pub field: String,
    pub heuristic_col: usize,
    pub fallback_col: usize,
}

// ==========================================
// ImportSummary - 导入批次汇总
// ==========================================
// 对齐 import_batch 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub file_name: Option<String>,
    pub total_rows: usize,     // 矩阵总行数 (含表头区)
    pub data_rows: usize,      // 命中数据行谓词的行数
    pub entries: usize,        // 实际产出的条目数
    pub skipped_cells: usize,  // 无值而跳过的 (行, 级别, 类型) 组合数
    pub layout_drifts: Vec<LayoutDrift>,
    pub report: ValidationReport,
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}
