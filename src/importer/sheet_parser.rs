// ==========================================
// 全球服务价格手册与报价系统 - 价格表文件解析器
// ==========================================
// 职责: Excel (.xlsx/.xls) / CSV (.csv) → 按位置的单元格矩阵
// 约定: 表头位置未知是本系统的前提, 因此不按列名键化,
//       统一输出 Vec<Vec<String>> 交给表头定位器
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 原始单元格矩阵 (行 × 列, 文本化)
pub type CellMatrix = Vec<Vec<String>>;

// ==========================================
// SheetParser Trait
// ==========================================
// 用途: 文件解析接口 (管道阶段 0)
// 实现者: ExcelSheetParser, CsvSheetParser
pub trait SheetParser: Send + Sync {
    /// 解析文件为单元格矩阵 (保留空单元格以维持列位置)
    fn parse_to_matrix(&self, file_path: &Path) -> ImportResult<CellMatrix>;
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvSheetParser;

impl SheetParser for CsvSheetParser {
    fn parse_to_matrix(&self, file_path: &Path) -> ImportResult<CellMatrix> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        if let Some(ext) = file_path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头区由定位器识别, 不在此消耗
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut matrix = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();
            matrix.push(row);
        }

        if matrix.is_empty() {
            return Err(ImportError::EmptySheet(file_path.display().to_string()));
        }

        Ok(matrix)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelSheetParser;

impl SheetParser for ExcelSheetParser {
    fn parse_to_matrix(&self, file_path: &Path) -> ImportResult<CellMatrix> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        // 取第一个非空 sheet
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "Excel 文件无工作表".to_string(),
            ));
        }

        for sheet_name in sheet_names {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

            if range.is_empty() {
                continue;
            }

            let matrix: CellMatrix = range
                .rows()
                .map(|row| {
                    row.iter()
                        .map(|cell| cell.to_string().trim().to_string())
                        .collect()
                })
                .collect();

            return Ok(matrix);
        }

        Err(ImportError::EmptySheet(file_path.display().to_string()))
    }
}

// ==========================================
// 通用文件解析器 (根据扩展名自动选择)
// ==========================================
pub struct UniversalSheetParser;

impl SheetParser for UniversalSheetParser {
    fn parse_to_matrix(&self, file_path: &Path) -> ImportResult<CellMatrix> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvSheetParser.parse_to_matrix(file_path),
            "xlsx" | "xls" => ExcelSheetParser.parse_to_matrix(file_path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
