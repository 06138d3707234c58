// ==========================================
// 全球服务价格手册与报价系统 - 价格手册 Repository Trait
// ==========================================
// 职责: 定义价格手册数据访问接口 (不包含业务逻辑)
// 红线: Repository 不含业务规则, 只做数据 CRUD
// ==========================================

use crate::domain::price_book::{ImportSummary, PriceBookEntry};
use crate::domain::types::{ServiceLevel, ServiceType};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// PriceBookRepository Trait
// ==========================================
// 用途: 价格手册数据访问
// 实现者: PriceBookRepositoryImpl (使用 rusqlite)
#[async_trait]
pub trait PriceBookRepository: Send + Sync {
    // ===== 批量写入 (事务化) =====

    /// 整批替换价格手册 (先清空后批量插入, 单事务原子换表)
    ///
    /// # 返回
    /// - Ok(usize): 插入的条目数
    /// - Err: 数据库错误 (整个事务回滚, 原价格手册保持不变)
    async fn replace_all(&self, entries: Vec<PriceBookEntry>) -> RepositoryResult<usize>;

    // ===== 点查询 =====

    /// 按自然键查询条目 (不按供应商过滤, 按 supplier 排序保证确定性)
    async fn find_entries(
        &self,
        country: &str,
        level: ServiceLevel,
        service_type: ServiceType,
    ) -> RepositoryResult<Vec<PriceBookEntry>>;

    /// 条件过滤列表 (region/country/supplier 任意组合, 上限 limit)
    async fn list_filtered(
        &self,
        region: Option<&str>,
        country: Option<&str>,
        supplier: Option<&str>,
        limit: usize,
    ) -> RepositoryResult<Vec<PriceBookEntry>>;

    /// 全量读取 (审计层使用)
    async fn list_all(&self) -> RepositoryResult<Vec<PriceBookEntry>>;

    // ===== 去重投影 (选择流程使用) =====

    /// 去重后的区域列表 (升序)
    async fn distinct_regions(&self) -> RepositoryResult<Vec<String>>;

    /// 指定区域内去重后的国家列表 (升序)
    async fn distinct_countries(&self, region: &str) -> RepositoryResult<Vec<String>>;

    /// 条目总数
    async fn count(&self) -> RepositoryResult<usize>;

    // ===== 批次管理 =====

    /// 记录导入批次汇总
    async fn insert_batch(&self, summary: &ImportSummary) -> RepositoryResult<()>;

    /// 查询最近的导入批次
    async fn recent_batches(&self, limit: usize) -> RepositoryResult<Vec<ImportSummary>>;
}
