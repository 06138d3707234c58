// ==========================================
// 全球服务价格手册与报价系统 - 列布局解析器
// ==========================================
// 职责: 启发式定位 + 静态兜底布局 → 唯一权威列映射
// 优先级: 启发式结论优先; 仅在启发式未命中时使用兜底;
//         两侧均有结论且不一致时记录布局漂移 (不静默覆盖)
// ==========================================

use crate::domain::price_book::LayoutDrift;
use crate::domain::types::{ServiceLevel, ServiceType, SlaBand};
use crate::importer::header_locator::HeaderLocator;
use crate::importer::sheet_parser::CellMatrix;
use std::collections::BTreeMap;

// ===== 表头词元集合 =====

const TOKENS_REGION: &[&str] = &["region"];
const TOKENS_COUNTRY: &[&str] = &["country"];
const TOKENS_SUPPLIER: &[&str] = &["supplier"];
const TOKENS_CURRENCY: &[&str] = &["currency"];
const TOKENS_PAYMENT_TERMS: &[&str] = &["payment", "term"];

const TOKENS_FULL_DAY: &[&[&str]] = &[&["full", "day"]];
const TOKENS_HALF_DAY: &[&[&str]] = &[&["1/2", "4hrs"], &["half", "4hrs"]];
const TOKENS_DISPATCH: &[&[&str]] = &[&["dispatch", "per hour"], &["dispatch"]];

fn sla_tokens(band: SlaBand) -> &'static [&'static str] {
    match band {
        SlaBand::NineFiveFour => &["9x5x4"],
        SlaBand::TwentyFourSeven => &["24x7x4"],
        SlaBand::Sbd => &["sbd", "resolution"],
        SlaBand::Nbd => &["nbd", "resolution"],
        SlaBand::TwoBd => &["2bd", "resolution"],
        SlaBand::ThreeBd => &["3bd", "resolution"],
        SlaBand::FourBd => &["4", "bd", "resolution"],
        SlaBand::AdditionalHour => &["additional", "hour"],
    }
}

// ==========================================
// ColumnLayout - 权威列映射
// ==========================================
// 每次提取运行派生一次, 不持久化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub region_col: usize,
    pub country_col: usize,
    pub supplier_col: usize,
    pub currency_col: usize,
    pub payment_terms_col: usize,
    /// 服务类型 → (级别 → 列号); 缺失的组合即该组合未定价
    pub band_levels: BTreeMap<ServiceType, BTreeMap<ServiceLevel, usize>>,
    /// SLA 响应档 → 列号
    pub sla_cols: BTreeMap<SlaBand, usize>,
}

impl ColumnLayout {
    /// 已知规范表形状的静态兜底布局
    pub fn canonical_fallback() -> Self {
        let mut band_levels = BTreeMap::new();
        band_levels.insert(
            ServiceType::FullDayVisit,
            BTreeMap::from([
                (ServiceLevel::L1, 5),
                (ServiceLevel::L2, 7),
                (ServiceLevel::L3, 9),
                (ServiceLevel::L4, 11),
                (ServiceLevel::L5, 13),
            ]),
        );
        band_levels.insert(
            ServiceType::HalfDayVisit,
            BTreeMap::from([
                (ServiceLevel::L1, 15),
                (ServiceLevel::L2, 16),
                (ServiceLevel::L3, 17),
            ]),
        );
        band_levels.insert(
            ServiceType::DispatchTicket,
            BTreeMap::from([
                (ServiceLevel::L1, 18),
                (ServiceLevel::L2, 19),
                (ServiceLevel::L3, 20),
            ]),
        );

        let sla_cols = BTreeMap::from([
            (SlaBand::NineFiveFour, 22),
            (SlaBand::TwentyFourSeven, 23),
            (SlaBand::Sbd, 24),
            (SlaBand::Nbd, 25),
            (SlaBand::TwoBd, 26),
            (SlaBand::ThreeBd, 27),
            (SlaBand::AdditionalHour, 28),
            (SlaBand::FourBd, 31),
        ]);

        Self {
            region_col: 0,
            country_col: 1,
            supplier_col: 2,
            currency_col: 3,
            payment_terms_col: 4,
            band_levels,
            sla_cols,
        }
    }
}

// ==========================================
// ColumnLayoutResolver - 布局解析
// ==========================================
pub struct ColumnLayoutResolver;

impl ColumnLayoutResolver {
    /// 解析权威列布局, 并返回启发式与兜底布局的分歧记录
    pub fn resolve(matrix: &CellMatrix) -> (ColumnLayout, Vec<LayoutDrift>) {
        let locator = HeaderLocator::new(matrix);
        let fallback = ColumnLayout::canonical_fallback();
        let mut drifts = Vec::new();

        // ===== 身份列 =====
        let region_col = Self::pick(
            "identity.region",
            locator.locate(TOKENS_REGION).map(|p| p.col),
            fallback.region_col,
            &mut drifts,
        );
        let country_col = Self::pick(
            "identity.country",
            locator.locate(TOKENS_COUNTRY).map(|p| p.col),
            fallback.country_col,
            &mut drifts,
        );
        let supplier_col = Self::pick(
            "identity.supplier",
            locator.locate(TOKENS_SUPPLIER).map(|p| p.col),
            fallback.supplier_col,
            &mut drifts,
        );
        let currency_col = Self::pick(
            "identity.currency",
            locator.locate(TOKENS_CURRENCY).map(|p| p.col),
            fallback.currency_col,
            &mut drifts,
        );
        let payment_terms_col = Self::pick(
            "identity.payment_terms",
            locator.locate(TOKENS_PAYMENT_TERMS).map(|p| p.col),
            fallback.payment_terms_col,
            &mut drifts,
        );

        // ===== 服务波段锚点 =====
        // 同一表头行内多个波段并排, 级别标记扫描须以相邻锚点为右边界,
        // 否则半天/派单波段会误取全天波段的级别列
        let anchors: Vec<(ServiceType, Option<crate::importer::header_locator::CellPos>)> = vec![
            (ServiceType::FullDayVisit, locator.locate_any(TOKENS_FULL_DAY)),
            (ServiceType::HalfDayVisit, locator.locate_any(TOKENS_HALF_DAY)),
            (ServiceType::DispatchTicket, locator.locate_any(TOKENS_DISPATCH)),
        ];
        let anchor_cols: Vec<usize> = anchors.iter().filter_map(|(_, p)| p.map(|p| p.col)).collect();

        let mut band_levels: BTreeMap<ServiceType, BTreeMap<ServiceLevel, usize>> = BTreeMap::new();
        for (service_type, anchor) in &anchors {
            let heuristic_levels = anchor
                .map(|pos| {
                    let window_end = anchor_cols
                        .iter()
                        .copied()
                        .filter(|c| *c > pos.col)
                        .min()
                        .unwrap_or(usize::MAX);
                    Self::levels_in_window(&locator, pos.row, pos.col, window_end)
                })
                .unwrap_or_default();

            let fallback_levels = fallback
                .band_levels
                .get(service_type)
                .cloned()
                .unwrap_or_default();

            let mut merged = BTreeMap::new();
            for level in ServiceLevel::ALL {
                let heuristic = heuristic_levels.get(&level).copied();
                let fallback_col = fallback_levels.get(&level).copied();
                match (heuristic, fallback_col) {
                    (Some(h), Some(f)) => {
                        if h != f {
                            drifts.push(LayoutDrift {
                                field: format!("{}.{}", service_type.as_str(), level.as_str()),
                                heuristic_col: h,
                                fallback_col: f,
                            });
                        }
                        merged.insert(level, h);
                    }
                    (Some(h), None) => {
                        merged.insert(level, h);
                    }
                    (None, Some(f)) => {
                        merged.insert(level, f);
                    }
                    (None, None) => {}
                }
            }
            if !merged.is_empty() {
                band_levels.insert(*service_type, merged);
            }
        }

        // ===== SLA 档列 =====
        let mut sla_cols = BTreeMap::new();
        for band in SlaBand::ALL {
            let heuristic = locator.locate(sla_tokens(band)).map(|p| p.col);
            let fallback_col = fallback.sla_cols.get(&band).copied();
            match (heuristic, fallback_col) {
                (Some(h), Some(f)) => {
                    if h != f {
                        drifts.push(LayoutDrift {
                            field: format!("sla.{}", band.as_str()),
                            heuristic_col: h,
                            fallback_col: f,
                        });
                    }
                    sla_cols.insert(band, h);
                }
                (Some(h), None) => {
                    sla_cols.insert(band, h);
                }
                (None, Some(f)) => {
                    sla_cols.insert(band, f);
                }
                (None, None) => {}
            }
        }

        (
            ColumnLayout {
                region_col,
                country_col,
                supplier_col,
                currency_col,
                payment_terms_col,
                band_levels,
                sla_cols,
            },
            drifts,
        )
    }

    /// 启发式优先; 两侧不一致时记录漂移
    fn pick(
        field: &str,
        heuristic: Option<usize>,
        fallback: usize,
        drifts: &mut Vec<LayoutDrift>,
    ) -> usize {
        match heuristic {
            Some(col) => {
                if col != fallback {
                    drifts.push(LayoutDrift {
                        field: field.to_string(),
                        heuristic_col: col,
                        fallback_col: fallback,
                    });
                }
                col
            }
            None => fallback,
        }
    }

    /// 在锚点行的 [start, end) 列窗口内扫描级别标记
    fn levels_in_window(
        locator: &HeaderLocator,
        row: usize,
        start: usize,
        end: usize,
    ) -> BTreeMap<ServiceLevel, usize> {
        locator
            .locate_levels_in_row(row)
            .into_iter()
            .filter(|(_, col)| *col >= start && *col < end)
            .collect()
    }
}
