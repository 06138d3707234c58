// ==========================================
// 全球服务价格手册与报价系统 - 报价契约结构
// ==========================================
// 职责: 报价请求/结果 DTO, 传输层按此序列化
// ==========================================

use crate::domain::types::{ServiceLevel, ServiceType};
use serde::{Deserialize, Serialize};

// ==========================================
// QuoteRequest - 已解析的报价请求
// ==========================================
// country/level/service_type 为必填维度, 在 API 层完成解析校验
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub country: String,
    pub level: ServiceLevel,
    pub service_type: ServiceType,
    /// 供应商限定 (可选); 多供应商同键且未限定时报价将要求消歧
    pub supplier: Option<String>,
    /// 单程距离 (公里), 缺省 0
    #[serde(default)]
    pub distance_km: f64,
    #[serde(default)]
    pub out_of_hours: bool,
    #[serde(default)]
    pub weekend: bool,
}

// ==========================================
// MultipliersApplied - 已生效乘数明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipliersApplied {
    pub out_of_hours: bool,
    pub weekend: bool,
    /// 两类乘数的乘积 (都不生效时为 1)
    pub multiplier: f64,
}

// ==========================================
// QuoteResult - 报价结果
// ==========================================
// 金额口径: base_price 不舍入; travel_fee / fee_amount / total
// 各自独立按两位小数舍入 (远离零的四舍五入)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResult {
    // ===== 身份回显 =====
    pub region: String,
    pub country: String,
    pub supplier: String,
    pub currency: String,
    pub payment_terms: String,
    pub level: ServiceLevel,
    pub service_type: ServiceType,

    // ===== 金额字段 =====
    pub base_price: f64, // 条目基础价 (未舍入, 乘数前)
    pub travel_fee: f64,
    pub multipliers_applied: MultipliersApplied,
    pub fee_pct: f64,
    pub fee_amount: f64,
    pub total: f64,
}
