// ==========================================
// 全球服务价格手册与报价系统 - 导入 API
// ==========================================
// 职责: 导入与审计的对外编排 (薄封装, 业务在导入层/引擎层)
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::price_book::{ImportSummary, ValidationReport};
use crate::engine::price_book_audit::PriceBookAuditor;
use crate::importer::price_book_importer_trait::PriceBookImporter;
use crate::repository::PriceBookRepository;
use std::path::Path;
use tracing::instrument;

// ==========================================
// ImportApi - 导入接口
// ==========================================
pub struct ImportApi<I, P>
where
    I: PriceBookImporter,
    P: PriceBookRepository,
{
    importer: I,
    price_book_repo: P,
    auditor: PriceBookAuditor,
}

impl<I, P> ImportApi<I, P>
where
    I: PriceBookImporter,
    P: PriceBookRepository,
{
    pub fn new(importer: I, price_book_repo: P, auditor: PriceBookAuditor) -> Self {
        Self {
            importer,
            price_book_repo,
            auditor,
        }
    }

    /// 从价格表文件导入价格手册 (整批替换)
    #[instrument(skip(self, file_path))]
    pub async fn import_price_book<F: AsRef<Path> + Send>(
        &self,
        file_path: F,
    ) -> ApiResult<ImportSummary> {
        Ok(self.importer.import_from_file(file_path).await?)
    }

    /// 对当前入库的价格手册做结构审计 (只读)
    ///
    /// 数据质量问题进入报告; 仅存储不可达时返回错误。
    #[instrument(skip(self))]
    pub async fn audit_price_book(&self) -> ApiResult<ValidationReport> {
        let entries = self.price_book_repo.list_all().await?;
        Ok(self.auditor.audit(&entries))
    }

    /// 最近导入批次列表
    pub async fn recent_batches(&self, limit: usize) -> ApiResult<Vec<ImportSummary>> {
        Ok(self.price_book_repo.recent_batches(limit).await?)
    }
}
