// ==========================================
// 全球服务价格手册与报价系统 - API 层
// ==========================================
// 职责: 对外业务接口 (传输层按此契约封送)
// ==========================================

pub mod error;
pub mod import_api;
pub mod quote_api;

// 重导出核心接口
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
pub use quote_api::{QuoteApi, QuoteParams, LIST_LIMIT};
