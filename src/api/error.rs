// ==========================================
// 全球服务价格手册与报价系统 - API 层错误类型
// ==========================================
// 职责: 定义对外接口错误, 转换仓储/导入错误为调用方可读的错误
// 约定: 报价失败只影响单次请求, 无需回滚任何状态
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求校验错误
    // ==========================================
    /// 必填维度缺失或不可解析 (country / level / service_type)
    #[error("无效请求: {0}")]
    InvalidRequest(String),

    /// 自然键无匹配条目 (绝不以零价结果兜底)
    #[error("未找到报价条目: {0}")]
    NotFound(String),

    /// 多供应商同键且请求未限定供应商
    #[error("供应商歧义: {country} {level} {service_type} 存在多个供应商 {candidates:?}, 请求须限定 supplier")]
    AmbiguousSupplier {
        country: String,
        level: String,
        service_type: String,
        candidates: Vec<String>,
    },

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportFailed(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将仓储层的技术错误转换为调用方可读的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, key } => {
                ApiError::NotFound(format!("{} (key={})", entity, key))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<crate::importer::error::ImportError> for ApiError {
    fn from(err: crate::importer::error::ImportError) -> Self {
        ApiError::ImportFailed(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
