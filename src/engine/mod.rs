// ==========================================
// 全球服务价格手册与报价系统 - 引擎层
// ==========================================
// 职责: 业务规则计算, 纯逻辑, 不直接访问数据库
// ==========================================

pub mod price_book_audit;
pub mod quote_calculator;

// 重导出核心引擎
pub use price_book_audit::{PriceBookAuditor, RateExpectation};
pub use quote_calculator::{round2, QuoteCalculator};
