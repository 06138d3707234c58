// ==========================================
// 全球服务价格手册与报价系统 - 价格手册导入器实现
// ==========================================
// 职责: 整合导入管道, 从价格表文件到数据库
// 流程: 解析 → 布局解析 → 行提取 → 审计 → 原子换表 → 批次记录
// 红线: 任一阶段失败即整批中止 (事务回滚, 价格手册保持原状)
// ==========================================

use crate::domain::price_book::ImportSummary;
use crate::engine::price_book_audit::PriceBookAuditor;
use crate::importer::column_layout::ColumnLayoutResolver;
use crate::importer::error::ImportResult;
use crate::importer::price_book_importer_trait::PriceBookImporter;
use crate::importer::row_extractor::RowExtractor;
use crate::importer::sheet_parser::SheetParser;
use crate::repository::{PriceBookRepository, TermsRepository};
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// PriceBookImporterImpl - 价格手册导入器实现
// ==========================================
pub struct PriceBookImporterImpl<R, T>
where
    R: PriceBookRepository,
    T: TermsRepository,
{
    // 数据访问层
    price_book_repo: R,
    terms_repo: T,

    // 导入组件
    sheet_parser: Box<dyn SheetParser>,
    auditor: PriceBookAuditor,
}

impl<R, T> PriceBookImporterImpl<R, T>
where
    R: PriceBookRepository,
    T: TermsRepository,
{
    /// 创建新的 PriceBookImporter 实例
    pub fn new(
        price_book_repo: R,
        terms_repo: T,
        sheet_parser: Box<dyn SheetParser>,
        auditor: PriceBookAuditor,
    ) -> Self {
        Self {
            price_book_repo,
            terms_repo,
            sheet_parser,
            auditor,
        }
    }
}

#[async_trait::async_trait]
impl<R, T> PriceBookImporter for PriceBookImporterImpl<R, T>
where
    R: PriceBookRepository + Send + Sync,
    T: TermsRepository + Send + Sync,
{
    #[instrument(skip(self, file_path), fields(batch_id))]
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let file_path = file_path.as_ref();
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string());

        info!(batch_id = %batch_id, file = %file_path.display(), "开始导入价格手册");

        // === 步骤 1: 解析文件为单元格矩阵 ===
        debug!("步骤 1: 解析文件");
        let matrix = self.sheet_parser.parse_to_matrix(file_path)?;
        let total_rows = matrix.len();
        info!(total_rows = total_rows, "文件解析完成");

        // === 步骤 2: 列布局解析 ===
        debug!("步骤 2: 列布局解析");
        let (layout, layout_drifts) = ColumnLayoutResolver::resolve(&matrix);
        for drift in &layout_drifts {
            warn!(
                field = %drift.field,
                heuristic = drift.heuristic_col,
                fallback = drift.fallback_col,
                "检测到表格布局漂移 (采用启发式结论)"
            );
        }
        info!(drifts = layout_drifts.len(), "列布局解析完成");

        // === 步骤 3: 数据行提取 ===
        debug!("步骤 3: 数据行提取");
        let (entries, stats) = RowExtractor.extract(&matrix, &layout, &batch_id);
        info!(
            data_rows = stats.data_rows,
            entries = entries.len(),
            skipped = stats.skipped_cells,
            "数据行提取完成"
        );

        // === 步骤 4: 结构审计 (只收集, 不中断) ===
        debug!("步骤 4: 结构审计");
        let report = self.auditor.audit(&entries);
        if report.issue_count > 0 {
            warn!(issues = report.issue_count, "结构审计存在发现");
        }

        // === 步骤 5: 整批替换入库 (单事务) ===
        debug!("步骤 5: 整批替换入库");
        let entry_count = entries.len();
        let inserted = self.price_book_repo.replace_all(entries).await?;
        info!(count = inserted, "价格手册替换完成");

        // === 步骤 6: 商务条款缺失时播种缺省值 ===
        debug!("步骤 6: 商务条款播种");
        if self.terms_repo.seed_default_if_missing().await? {
            info!("已播种缺省商务条款");
        }

        // === 步骤 7: 记录批次信息 ===
        let elapsed = start_time.elapsed();
        let summary = ImportSummary {
            batch_id: batch_id.clone(),
            file_name,
            total_rows,
            data_rows: stats.data_rows,
            entries: entry_count,
            skipped_cells: stats.skipped_cells,
            layout_drifts,
            report,
            imported_at: Utc::now(),
            elapsed_ms: elapsed.as_millis() as u64,
        };
        self.price_book_repo.insert_batch(&summary).await?;

        info!(
            batch_id = %batch_id,
            entries = summary.entries,
            issues = summary.report.issue_count,
            elapsed_ms = summary.elapsed_ms,
            "价格手册导入完成"
        );

        Ok(summary)
    }
}
