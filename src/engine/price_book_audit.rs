// ==========================================
// 全球服务价格手册与报价系统 - 价格手册结构审计
// ==========================================
// 职责: 提取结果的只读结构审计, 产出报告
// 红线: 数据质量问题只收集不抛错, 不修改任何条目
// ==========================================

use crate::domain::price_book::{PriceBookEntry, StructuralIssue, ValidationReport};
use crate::domain::types::{ServiceLevel, ServiceType};
use std::collections::{BTreeMap, BTreeSet};

/// 报告中保留的发现数上限 (超出部分仅计入 issue_count)
pub const MAX_REPORTED_ISSUES: usize = 50;

/// 区域覆盖下限 (全球价格表应至少覆盖的区域数)
pub const MIN_REGION_COUNT: usize = 5;

/// 每个国家必须覆盖的级别
const REQUIRED_LEVELS: [ServiceLevel; 3] = [ServiceLevel::L1, ServiceLevel::L2, ServiceLevel::L3];

// ==========================================
// RateExpectation - 已知锚点值抽检
// ==========================================
// 用途: 捕捉提取回归 (列错位会立即体现在锚点值上)
#[derive(Debug, Clone)]
pub struct RateExpectation {
    pub country: &'static str,
    pub level: ServiceLevel,
    pub service_type: ServiceType,
    pub currency: &'static str,
    pub base_rate: f64,
}

/// 基础价抽检的绝对容差
pub const EXPECTATION_TOLERANCE: f64 = 1.0;

/// 规范价格表的锚点值
pub fn canonical_expectations() -> Vec<RateExpectation> {
    vec![
        RateExpectation {
            country: "Australia",
            level: ServiceLevel::L1,
            service_type: ServiceType::FullDayVisit,
            currency: "USD",
            base_rate: 48000.0,
        },
        RateExpectation {
            country: "United Kingdom",
            level: ServiceLevel::L1,
            service_type: ServiceType::FullDayVisit,
            currency: "GBP",
            base_rate: 36000.0,
        },
        RateExpectation {
            country: "Japan",
            level: ServiceLevel::L1,
            service_type: ServiceType::FullDayVisit,
            currency: "USD",
            base_rate: 65000.0,
        },
        RateExpectation {
            country: "India",
            level: ServiceLevel::L1,
            service_type: ServiceType::FullDayVisit,
            currency: "USD",
            base_rate: 5995.0,
        },
    ]
}

// ==========================================
// PriceBookAuditor - 结构审计器
// ==========================================
pub struct PriceBookAuditor {
    min_region_count: usize,
    expectations: Vec<RateExpectation>,
}

impl Default for PriceBookAuditor {
    fn default() -> Self {
        Self {
            min_region_count: MIN_REGION_COUNT,
            expectations: canonical_expectations(),
        }
    }
}

impl PriceBookAuditor {
    /// 不带锚点抽检的审计器 (非规范表来源使用)
    pub fn without_expectations(min_region_count: usize) -> Self {
        Self {
            min_region_count,
            expectations: Vec::new(),
        }
    }

    /// 审计完整条目集, 产出结构报告。只读, 永不修改, 永不抛错。
    pub fn audit(&self, entries: &[PriceBookEntry]) -> ValidationReport {
        let mut issues = Vec::new();

        // (1) 条目总数
        if entries.is_empty() {
            issues.push(StructuralIssue::global("price_book", "价格手册为空"));
        }

        // (2) 区域覆盖
        let regions: BTreeSet<&str> = entries.iter().map(|e| e.region.as_str()).collect();
        if !entries.is_empty() && regions.len() < self.min_region_count {
            issues.push(StructuralIssue::global(
                "region",
                format!(
                    "区域覆盖不足: {} < {}",
                    regions.len(),
                    self.min_region_count
                ),
            ));
        }

        // (3) 每国覆盖: 三种服务类型 + L1..L3 至少各有一条
        let mut by_country: BTreeMap<&str, Vec<&PriceBookEntry>> = BTreeMap::new();
        for entry in entries {
            by_country.entry(entry.country.as_str()).or_default().push(entry);
        }

        for (country, country_entries) in &by_country {
            let service_types: BTreeSet<ServiceType> =
                country_entries.iter().map(|e| e.service_type).collect();
            for service_type in ServiceType::ALL {
                if !service_types.contains(&service_type) {
                    issues.push(StructuralIssue::for_country(
                        country,
                        "service_type",
                        format!("缺少服务类型 {}", service_type.as_str()),
                    ));
                }
            }

            let levels: BTreeSet<ServiceLevel> =
                country_entries.iter().map(|e| e.level).collect();
            for level in REQUIRED_LEVELS {
                if !levels.contains(&level) {
                    issues.push(StructuralIssue::for_country(
                        country,
                        "level",
                        format!("缺少级别 {}", level.as_str()),
                    ));
                }
            }

            // (4) 条目字段有效性
            for entry in country_entries {
                if entry.currency.is_empty() {
                    issues.push(StructuralIssue::for_country(
                        country,
                        "currency",
                        format!("{} {} 缺少币种", entry.service_type.as_str(), entry.level),
                    ));
                }
                if entry.payment_terms.is_empty() {
                    issues.push(StructuralIssue::for_country(
                        country,
                        "payment_terms",
                        format!("{} {} 缺少付款条款", entry.service_type.as_str(), entry.level),
                    ));
                }
                if entry.base_rate <= 0.0 {
                    issues.push(StructuralIssue::for_country(
                        country,
                        "base_rate",
                        format!(
                            "{} {} 基础价非正数: {}",
                            entry.service_type.as_str(),
                            entry.level,
                            entry.base_rate
                        ),
                    ));
                }
            }
        }

        // (5) 锚点值抽检 (容差 ±1)
        for check in &self.expectations {
            let hit = entries.iter().find(|e| {
                e.country == check.country
                    && e.level == check.level
                    && e.service_type == check.service_type
            });
            match hit {
                None => issues.push(StructuralIssue::for_country(
                    check.country,
                    "expectation",
                    format!(
                        "缺少锚点条目 {} {}",
                        check.level,
                        check.service_type.as_str()
                    ),
                )),
                Some(entry) => {
                    if entry.currency != check.currency {
                        issues.push(StructuralIssue::for_country(
                            check.country,
                            "currency",
                            format!(
                                "锚点币种不符: 实际 {} 期望 {}",
                                entry.currency, check.currency
                            ),
                        ));
                    }
                    if (entry.base_rate - check.base_rate).abs() >= EXPECTATION_TOLERANCE {
                        issues.push(StructuralIssue::for_country(
                            check.country,
                            "base_rate",
                            format!(
                                "锚点基础价不符: 实际 {} 期望 {}",
                                entry.base_rate, check.base_rate
                            ),
                        ));
                    }
                }
            }
        }

        let issue_count = issues.len();
        issues.truncate(MAX_REPORTED_ISSUES);

        ValidationReport {
            total_entries: entries.len(),
            region_count: regions.len(),
            country_count: by_country.len(),
            issue_count,
            issues,
        }
    }
}
