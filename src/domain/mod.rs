// ==========================================
// 全球服务价格手册与报价系统 - 领域层
// ==========================================
// 职责: 实体与类型定义, 不含 I/O 与业务编排
// ==========================================

pub mod price_book;
pub mod quote;
pub mod terms;
pub mod types;

// 重导出核心类型
pub use price_book::{
    ImportSummary, IncidentRates, LayoutDrift, PriceBookEntry, StructuralIssue, ValidationReport,
};
pub use quote::{MultipliersApplied, QuoteRequest, QuoteResult};
pub use terms::TermsConditions;
pub use types::{ServiceLevel, ServiceType, SlaBand};
