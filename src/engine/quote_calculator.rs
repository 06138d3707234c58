// ==========================================
// 全球服务价格手册与报价系统 - 报价计算引擎
// ==========================================
// 职责: (价格条目, 商务条款, 请求参数) → 报价结果, 纯函数
// 公式 (顺序固定):
//   1. travel_fee = max(0, distance - threshold) × per_km
//   2. multiplier = 1 (×非工作时段乘数) (×周末乘数), 两标志独立复合
//   3. subtotal = base_rate × multiplier
//   4. fee_amount = (subtotal + travel_fee) × fee_pct / 100  (管理费对差旅同样计提)
//   5. total = subtotal + travel_fee + fee_amount
// 舍入法则: 远离零的四舍五入, travel_fee / fee_amount / total
//           各自独立从未舍入中间值舍入到两位小数
// ==========================================

use crate::domain::price_book::PriceBookEntry;
use crate::domain::quote::{MultipliersApplied, QuoteRequest, QuoteResult};
use crate::domain::terms::TermsConditions;

/// 两位小数舍入 (远离零的四舍五入)
///
/// f64::round 对 .5 远离零舍入, 与报价单口径一致;
/// 边界值行为在测试中显式固定。
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==========================================
// QuoteCalculator - 报价计算
// ==========================================
pub struct QuoteCalculator;

impl QuoteCalculator {
    /// 计算一次报价。纯函数: 无 I/O, 无副作用, 相同输入必得相同输出。
    ///
    /// 条目查找与请求校验由 API 层完成, 此处假定输入已合法。
    pub fn calculate(
        entry: &PriceBookEntry,
        terms: &TermsConditions,
        request: &QuoteRequest,
    ) -> QuoteResult {
        // 1. 差旅费: 仅超出起征里程的部分计费
        let excess_km = (request.distance_km - terms.travel_threshold_km).max(0.0);
        let travel_fee = excess_km * terms.travel_charge_per_km;

        // 2. 乘数: 两标志独立, 同时生效时相乘
        let mut multiplier = 1.0;
        if request.out_of_hours {
            multiplier *= terms.out_of_hours_multiplier;
        }
        if request.weekend {
            multiplier *= terms.weekend_holiday_multiplier;
        }

        // 3-5. 服务价 → 管理费 → 合计 (中间值不舍入)
        let subtotal = entry.base_rate * multiplier;
        let fee_pct = terms.service_management_fee_pct;
        let fee_amount = (subtotal + travel_fee) * (fee_pct / 100.0);
        let total = subtotal + travel_fee + fee_amount;

        QuoteResult {
            region: entry.region.clone(),
            country: entry.country.clone(),
            supplier: entry.supplier.clone(),
            currency: entry.currency.clone(),
            payment_terms: entry.payment_terms.clone(),
            level: entry.level,
            service_type: entry.service_type,
            base_price: entry.base_rate,
            travel_fee: round2(travel_fee),
            multipliers_applied: MultipliersApplied {
                out_of_hours: request.out_of_hours,
                weekend: request.weekend,
                multiplier,
            },
            fee_pct,
            fee_amount: round2(fee_amount),
            total: round2(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_book::IncidentRates;
    use crate::domain::types::{ServiceLevel, ServiceType};
    use chrono::Utc;

    fn entry(base_rate: f64) -> PriceBookEntry {
        PriceBookEntry {
            entry_id: "e1".to_string(),
            region: "APAC".to_string(),
            country: "Australia".to_string(),
            supplier: "Direct".to_string(),
            currency: "USD".to_string(),
            payment_terms: "45 Days".to_string(),
            level: ServiceLevel::L1,
            service_type: ServiceType::FullDayVisit,
            base_rate,
            incident_rates: IncidentRates::default(),
            additional_hour_rate: None,
            batch_id: "b1".to_string(),
            created_at: Utc::now(),
        }
    }

    fn request(distance: f64, out_of_hours: bool, weekend: bool) -> QuoteRequest {
        QuoteRequest {
            country: "Australia".to_string(),
            level: ServiceLevel::L1,
            service_type: ServiceType::FullDayVisit,
            supplier: None,
            distance_km: distance,
            out_of_hours,
            weekend,
        }
    }

    #[test]
    fn test_reference_quote() {
        // 固定算例: 48000 基础价, 80km, 非工作时段
        let result = QuoteCalculator::calculate(
            &entry(48000.0),
            &TermsConditions::default(),
            &request(80.0, true, false),
        );

        assert_eq!(result.travel_fee, 12.0); // (80-50) × 0.4
        assert_eq!(result.base_price, 48000.0);
        assert_eq!(result.multipliers_applied.multiplier, 1.5);
        assert_eq!(result.fee_amount, 3600.60); // (72000+12) × 5%
        assert_eq!(result.total, 75612.60);
    }

    #[test]
    fn test_no_travel_fee_within_threshold() {
        let terms = TermsConditions::default();
        for distance in [0.0, 25.0, 50.0] {
            let result = QuoteCalculator::calculate(&entry(1000.0), &terms, &request(distance, false, false));
            assert_eq!(result.travel_fee, 0.0, "distance={}", distance);
        }
    }

    #[test]
    fn test_multipliers_compose() {
        // 同时命中非工作时段与周末: 1.5 × 2 = 3
        let result = QuoteCalculator::calculate(
            &entry(1000.0),
            &TermsConditions::default(),
            &request(0.0, true, true),
        );

        assert_eq!(result.multipliers_applied.multiplier, 3.0);
        assert_eq!(result.fee_amount, 150.0); // 3000 × 5%
        assert_eq!(result.total, 3150.0);
    }

    #[test]
    fn test_fee_levied_on_travel_too() {
        // 管理费基数包含差旅费
        let result = QuoteCalculator::calculate(
            &entry(1000.0),
            &TermsConditions::default(),
            &request(150.0, false, false),
        );

        assert_eq!(result.travel_fee, 40.0); // 100 × 0.4
        assert_eq!(result.fee_amount, 52.0); // (1000+40) × 5%
        assert_eq!(result.total, 1092.0);
    }

    #[test]
    fn test_custom_terms_override_defaults() {
        let terms = TermsConditions {
            service_management_fee_pct: 10.0,
            travel_charge_per_km: 1.0,
            travel_threshold_km: 0.0,
            out_of_hours_multiplier: 2.0,
            weekend_holiday_multiplier: 3.0,
        };
        let result = QuoteCalculator::calculate(&entry(100.0), &terms, &request(10.0, true, false));

        assert_eq!(result.travel_fee, 10.0);
        assert_eq!(result.fee_amount, 21.0); // (200+10) × 10%
        assert_eq!(result.total, 231.0);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(2.675_000_1), 2.68);
        assert_eq!(round2(-1.005_000_1), -1.01);
        assert_eq!(round2(1.004), 1.0);
        // 二进制浮点下 1.115 实际略小于 1.115, 舍入结果固定为 1.11
        assert_eq!(round2(1.115), 1.11);
    }

    #[test]
    fn test_rounding_is_independent_per_field() {
        // travel/fee/total 各自从未舍入中间值舍入
        let terms = TermsConditions {
            service_management_fee_pct: 5.0,
            travel_charge_per_km: 0.333,
            travel_threshold_km: 0.0,
            out_of_hours_multiplier: 1.5,
            weekend_holiday_multiplier: 2.0,
        };
        let result = QuoteCalculator::calculate(&entry(100.0), &terms, &request(10.0, false, false));

        // travel 未舍入值 3.33; fee = (100+3.33)×0.05 = 5.1665 → 5.17
        assert_eq!(result.travel_fee, 3.33);
        assert_eq!(result.fee_amount, 5.17);
        // total = 100 + 3.33 + 5.1665 = 108.4965 → 108.5
        assert_eq!(result.total, 108.5);
    }
}
