// ==========================================
// 全球服务价格手册与报价系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口, 屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化, 防止 SQL 注入
// ==========================================

pub mod error;
pub mod price_book_repo;
pub mod price_book_repo_impl;
pub mod terms_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use price_book_repo::PriceBookRepository;
pub use price_book_repo_impl::PriceBookRepositoryImpl;
pub use terms_repo::{TermsRepository, TermsRepositoryImpl};
