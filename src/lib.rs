// ==========================================
// 全球服务价格手册与报价系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 价格手册提取与报价决策支持
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 数据库基础设施（连接初始化/PRAGMA 统一/schema 引导）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ServiceLevel, ServiceType, SlaBand};

// 领域实体
pub use domain::{
    ImportSummary, IncidentRates, LayoutDrift, MultipliersApplied, PriceBookEntry, QuoteRequest,
    QuoteResult, StructuralIssue, TermsConditions, ValidationReport,
};

// 引擎
pub use engine::{PriceBookAuditor, QuoteCalculator};

// 导入器
pub use importer::{PriceBookImporter, PriceBookImporterImpl, UniversalSheetParser};

// 仓储
pub use repository::{
    PriceBookRepository, PriceBookRepositoryImpl, TermsRepository, TermsRepositoryImpl,
};

// API
pub use api::{ApiError, ImportApi, QuoteApi, QuoteParams};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "全球服务价格手册与报价系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
