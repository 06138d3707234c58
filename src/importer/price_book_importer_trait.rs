// ==========================================
// 全球服务价格手册与报价系统 - 价格手册导入 Trait
// ==========================================
// 职责: 定义导入接口 (不包含实现)
// ==========================================

use crate::domain::price_book::ImportSummary;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// PriceBookImporter Trait
// ==========================================
// 用途: 价格手册导入主接口
// 实现者: PriceBookImporterImpl
#[async_trait]
pub trait PriceBookImporter: Send + Sync {
    /// 从价格表文件 (.xlsx/.xls/.csv) 导入价格手册
    ///
    /// # 导入流程
    /// 1. 文件解析为单元格矩阵
    /// 2. 表头定位 + 列布局解析 (启发式优先, 兜底补缺, 漂移记录)
    /// 3. 数据行提取 → 标准化条目
    /// 4. 结构性审计 (只收集, 不中断)
    /// 5. 整批替换入库 (单事务, 原子换表) + 批次记录
    /// 6. 商务条款单例缺失时播种缺省值
    ///
    /// # 返回
    /// - Ok(ImportSummary): 批次汇总 (含审计报告与布局漂移)
    /// - Err: 文件/解析/存储错误 (整批中止, 价格手册保持原状)
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary>;
}
