// ==========================================
// 全球服务价格手册与报价系统 - 表头定位器
// ==========================================
// 职责: 在表头区内按词元集合定位单元格, 解析级别标记列
// 约定: 行优先 + 从左到右扫描, 首个命中即返回 (确定性)
// ==========================================

use crate::domain::types::ServiceLevel;
use crate::importer::sheet_parser::CellMatrix;
use std::collections::BTreeMap;

/// 表头区行数上限 (合并/多行表头都落在最上面的这些行内)
pub const HEADER_DECK_ROWS: usize = 15;

/// 表头区内的单元格位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

// ==========================================
// HeaderLocator - 表头区扫描
// ==========================================
pub struct HeaderLocator<'a> {
    deck: &'a [Vec<String>],
}

impl<'a> HeaderLocator<'a> {
    /// 基于完整矩阵构造, 只扫描最上方的表头区
    pub fn new(matrix: &'a CellMatrix) -> Self {
        let deck_rows = matrix.len().min(HEADER_DECK_ROWS);
        Self {
            deck: &matrix[..deck_rows],
        }
    }

    /// 定位首个包含全部词元的单元格。
    ///
    /// 匹配口径: 单元格文本小写后须包含每一个词元 (子串匹配);
    /// 只含部分词元的单元格不命中。
    pub fn locate(&self, tokens: &[&str]) -> Option<CellPos> {
        for (row_idx, row) in self.deck.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let lowered = cell.to_lowercase();
                if !lowered.is_empty() && tokens.iter().all(|t| lowered.contains(t)) {
                    return Some(CellPos {
                        row: row_idx,
                        col: col_idx,
                    });
                }
            }
        }
        None
    }

    /// 依次尝试多组候选词元, 返回首个命中 (用于有别名的波段表头)
    pub fn locate_any(&self, token_sets: &[&[&str]]) -> Option<CellPos> {
        token_sets.iter().find_map(|tokens| self.locate(tokens))
    }

    /// 在指定行内扫描 L1..L5 级别标记, 构建级别 → 列号映射。
    ///
    /// 标记归一化: 去空白 + 大写; 同一级别以最左侧出现为准。
    pub fn locate_levels_in_row(&self, row: usize) -> BTreeMap<ServiceLevel, usize> {
        let mut cols = BTreeMap::new();
        let Some(cells) = self.deck.get(row) else {
            return cols;
        };

        for (col_idx, cell) in cells.iter().enumerate() {
            if let Some(level) = ServiceLevel::parse(cell) {
                cols.entry(level).or_insert(col_idx);
            }
        }

        cols
    }
}
