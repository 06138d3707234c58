// ==========================================
// 全球服务价格手册与报价系统 - 数据行提取器
// ==========================================
// 职责: 按权威列布局遍历数据行, 产出标准化价格条目
// 数据行谓词: region 与 country 单元格均非空 (排除表头/装饰行)
// 红线: 单元格无值即静默跳过该组合 (常态, 非错误)
// 输出顺序: 行优先 → 波段顺序 → 波段内级别顺序 (确定性)
// ==========================================

use crate::domain::price_book::{IncidentRates, PriceBookEntry};
use crate::domain::types::{ServiceType, SlaBand};
use crate::importer::column_layout::ColumnLayout;
use crate::importer::numeric::coerce_rate;
use crate::importer::sheet_parser::CellMatrix;
use chrono::Utc;
use uuid::Uuid;

/// 供应商缺省值 (价格表未标注供应商即直营)
pub const DEFAULT_SUPPLIER: &str = "Direct";

/// 提取统计 (无值跳过数用于导入汇总)
#[derive(Debug, Clone, Default)]
pub struct ExtractionStats {
    pub data_rows: usize,
    pub skipped_cells: usize,
}

// ==========================================
// RowExtractor - 数据行提取
// ==========================================
pub struct RowExtractor;

impl RowExtractor {
    /// 提取全部价格条目。
    ///
    /// 对每个数据行 × 每个已解析列的 (服务类型, 级别) 组合:
    /// - 基础价解析无值 → 跳过该组合 (计入 skipped_cells)
    /// - 有值 → 产出一条 PriceBookEntry, SLA 档各自独立解析
    pub fn extract(
        &self,
        matrix: &CellMatrix,
        layout: &ColumnLayout,
        batch_id: &str,
    ) -> (Vec<PriceBookEntry>, ExtractionStats) {
        let mut entries = Vec::new();
        let mut stats = ExtractionStats::default();
        let now = Utc::now();

        for row in matrix {
            let region = cell_text(row, layout.region_col);
            let country = cell_text(row, layout.country_col);
            if region.is_empty() || country.is_empty() {
                continue; // 表头区或装饰行
            }
            stats.data_rows += 1;

            let supplier = {
                let raw = cell_text(row, layout.supplier_col);
                if raw.is_empty() {
                    DEFAULT_SUPPLIER.to_string()
                } else {
                    raw
                }
            };
            let currency = cell_text(row, layout.currency_col);
            let payment_terms = cell_text(row, layout.payment_terms_col);

            // SLA 档对整行生效, 每行解析一次
            let incident_rates = self.extract_incident_rates(row, layout);
            let additional_hour_rate = incident_rates.get(SlaBand::AdditionalHour);

            for service_type in ServiceType::ALL {
                let Some(level_cols) = layout.band_levels.get(&service_type) else {
                    continue;
                };
                for (level, col) in level_cols {
                    let Some(base_rate) = coerce_rate(&cell_text(row, *col)) else {
                        stats.skipped_cells += 1;
                        continue;
                    };

                    entries.push(PriceBookEntry {
                        entry_id: Uuid::new_v4().to_string(),
                        region: region.clone(),
                        country: country.clone(),
                        supplier: supplier.clone(),
                        currency: currency.clone(),
                        payment_terms: payment_terms.clone(),
                        level: *level,
                        service_type,
                        base_rate,
                        incident_rates: incident_rates.clone(),
                        additional_hour_rate,
                        batch_id: batch_id.to_string(),
                        created_at: now,
                    });
                }
            }
        }

        (entries, stats)
    }

    fn extract_incident_rates(&self, row: &[String], layout: &ColumnLayout) -> IncidentRates {
        let mut rates = IncidentRates::default();
        for (band, col) in &layout.sla_cols {
            rates.set(*band, coerce_rate(&cell_text(row, *col)));
        }
        rates
    }
}

/// 读取单元格文本 (越界视为空)
fn cell_text(row: &[String], col: usize) -> String {
    row.get(col).map(|v| v.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ServiceLevel;

    /// 兜底布局 + 单数据行的最小矩阵
    fn single_row_matrix(cells: Vec<(usize, &str)>) -> CellMatrix {
        let mut row = vec!["".to_string(); 32];
        for (col, value) in cells {
            row[col] = value.to_string();
        }
        vec![row]
    }

    fn base_identity() -> Vec<(usize, &'static str)> {
        vec![
            (0, "APAC"),
            (1, "Australia"),
            (3, "USD"),
            (4, "45 Days"),
        ]
    }

    #[test]
    fn test_extracts_entry_per_priced_combination() {
        let mut cells = base_identity();
        cells.push((5, "48,000")); // 全天 L1
        cells.push((15, "30,000")); // 半天 L1
        let matrix = single_row_matrix(cells);
        let layout = ColumnLayout::canonical_fallback();

        let (entries, stats) = RowExtractor.extract(&matrix, &layout, "batch-1");

        assert_eq!(entries.len(), 2);
        assert_eq!(stats.data_rows, 1);
        // 波段顺序: 全天在前
        assert_eq!(entries[0].service_type, ServiceType::FullDayVisit);
        assert_eq!(entries[0].level, ServiceLevel::L1);
        assert_eq!(entries[0].base_rate, 48000.0);
        assert_eq!(entries[1].service_type, ServiceType::HalfDayVisit);
        // 11 个定价列中 2 个有值
        assert_eq!(stats.skipped_cells, 9);
    }

    #[test]
    fn test_no_value_cell_never_emits_entry() {
        let mut cells = base_identity();
        cells.push((5, "N/A"));
        cells.push((7, ""));
        let matrix = single_row_matrix(cells);
        let layout = ColumnLayout::canonical_fallback();

        let (entries, stats) = RowExtractor.extract(&matrix, &layout, "batch-1");

        assert!(entries.is_empty());
        assert_eq!(stats.skipped_cells, 11);
    }

    #[test]
    fn test_header_rows_are_not_data_rows() {
        let matrix: CellMatrix = vec![
            {
                let mut row = vec!["".to_string(); 32];
                row[0] = "Region".to_string();
                // country 列为空 → 非数据行
                row[5] = "L1".to_string();
                row
            },
        ];
        let layout = ColumnLayout::canonical_fallback();

        let (entries, stats) = RowExtractor.extract(&matrix, &layout, "batch-1");
        assert!(entries.is_empty());
        assert_eq!(stats.data_rows, 0);
    }

    #[test]
    fn test_supplier_defaults_to_direct() {
        let mut cells = base_identity();
        cells.push((5, "48000"));
        let matrix = single_row_matrix(cells);
        let layout = ColumnLayout::canonical_fallback();

        let (entries, _) = RowExtractor.extract(&matrix, &layout, "batch-1");
        assert_eq!(entries[0].supplier, "Direct");
        assert_eq!(entries[0].currency, "USD");
        assert_eq!(entries[0].payment_terms, "45 Days");
    }

    #[test]
    fn test_incident_rates_independently_optional() {
        let mut cells = base_identity();
        cells.push((5, "48000"));
        cells.push((22, "US$120")); // 9x5x4
        cells.push((28, "95")); // AdditionalHour
        cells.push((24, "N/A")); // SBD 无值
        let matrix = single_row_matrix(cells);
        let layout = ColumnLayout::canonical_fallback();

        let (entries, _) = RowExtractor.extract(&matrix, &layout, "batch-1");
        let entry = &entries[0];
        assert_eq!(entry.incident_rates.nine_five_four, Some(120.0));
        assert_eq!(entry.incident_rates.additional_hour, Some(95.0));
        assert_eq!(entry.incident_rates.sbd, None);
        assert_eq!(entry.additional_hour_rate, Some(95.0));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let mut cells = base_identity();
        cells.push((5, "48000"));
        cells.push((7, "52000"));
        cells.push((18, "60"));
        let matrix = single_row_matrix(cells);
        let layout = ColumnLayout::canonical_fallback();

        let (first, _) = RowExtractor.extract(&matrix, &layout, "batch-1");
        let (second, _) = RowExtractor.extract(&matrix, &layout, "batch-2");

        let first_keys: Vec<_> = first.iter().map(|e| e.content_key()).collect();
        let second_keys: Vec<_> = second.iter().map(|e| e.content_key()).collect();
        assert_eq!(first_keys, second_keys);
    }
}
