// ==========================================
// 全球服务价格手册与报价系统 - 导入层
// ==========================================
// 职责: 外部价格表导入, 生成标准化价格手册
// 支持: Excel (.xlsx/.xls), CSV (.csv)
// 管道: 解析 → 表头定位 → 列布局解析 → 行提取 → 审计 → 入库
// ==========================================

// 模块声明
pub mod column_layout;
pub mod error;
pub mod header_locator;
pub mod numeric;
pub mod price_book_importer_impl;
pub mod price_book_importer_trait;
pub mod row_extractor;
pub mod sheet_parser;

// 重导出核心类型
pub use column_layout::{ColumnLayout, ColumnLayoutResolver};
pub use error::{ImportError, ImportResult};
pub use header_locator::{CellPos, HeaderLocator, HEADER_DECK_ROWS};
pub use numeric::coerce_rate;
pub use price_book_importer_impl::PriceBookImporterImpl;
pub use row_extractor::{ExtractionStats, RowExtractor, DEFAULT_SUPPLIER};
pub use sheet_parser::{CellMatrix, CsvSheetParser, ExcelSheetParser, SheetParser, UniversalSheetParser};

// 重导出 Trait 接口
pub use price_book_importer_trait::PriceBookImporter;
