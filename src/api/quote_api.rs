// ==========================================
// 全球服务价格手册与报价系统 - 报价 API
// ==========================================
// 职责: 选择流程查询 + 报价计算编排
// 约定: 报价为无状态只读路径, 并发调用无需加锁
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::price_book::PriceBookEntry;
use crate::domain::quote::{QuoteRequest, QuoteResult};
use crate::domain::types::{ServiceLevel, ServiceType};
use crate::engine::quote_calculator::QuoteCalculator;
use crate::repository::{PriceBookRepository, TermsRepository};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// 条目列表查询上限 (与传输层分页约定一致)
pub const LIST_LIMIT: usize = 500;

// ==========================================
// QuoteParams - 未解析的报价入参
// ==========================================
// 传输层原样透传的字符串参数, 在此完成解析与校验
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteParams {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub out_of_hours: bool,
    #[serde(default)]
    pub weekend: bool,
}

// ==========================================
// QuoteApi - 报价接口
// ==========================================
pub struct QuoteApi<P, T>
where
    P: PriceBookRepository,
    T: TermsRepository,
{
    price_book_repo: P,
    terms_repo: T,
}

impl<P, T> QuoteApi<P, T>
where
    P: PriceBookRepository,
    T: TermsRepository,
{
    pub fn new(price_book_repo: P, terms_repo: T) -> Self {
        Self {
            price_book_repo,
            terms_repo,
        }
    }

    /// 去重后的区域列表 (升序)
    pub async fn list_regions(&self) -> ApiResult<Vec<String>> {
        Ok(self.price_book_repo.distinct_regions().await?)
    }

    /// 指定区域内去重后的国家列表 (升序)
    pub async fn list_countries(&self, region: &str) -> ApiResult<Vec<String>> {
        if region.trim().is_empty() {
            return Err(ApiError::InvalidRequest("region 为必填项".to_string()));
        }
        Ok(self.price_book_repo.distinct_countries(region).await?)
    }

    /// 条件过滤的条目列表 (上限 LIST_LIMIT)
    pub async fn list_entries(
        &self,
        region: Option<&str>,
        country: Option<&str>,
        supplier: Option<&str>,
    ) -> ApiResult<Vec<PriceBookEntry>> {
        Ok(self
            .price_book_repo
            .list_filtered(region, country, supplier, LIST_LIMIT)
            .await?)
    }

    /// 计算一次报价。
    ///
    /// 流程: 入参解析 → 条目点查 → 供应商消歧 → 条款读取(缺省兜底) → 纯计算。
    /// 多供应商同键且未限定 supplier 时返回 AmbiguousSupplier,
    /// 由调用方带供应商重试, 而非静默取任意一条。
    #[instrument(skip(self))]
    pub async fn calculate_quote(&self, params: QuoteParams) -> ApiResult<QuoteResult> {
        let request = parse_params(params)?;

        let entries = self
            .price_book_repo
            .find_entries(&request.country, request.level, request.service_type)
            .await?;

        let entry = select_entry(&request, entries)?;

        // 条款记录或字段缺失时按缺省值报价
        let terms = self
            .terms_repo
            .find_singleton()
            .await?
            .unwrap_or_default();

        debug!(
            country = %request.country,
            level = %request.level,
            supplier = %entry.supplier,
            "报价条目命中"
        );

        Ok(QuoteCalculator::calculate(&entry, &terms, &request))
    }
}

/// 入参解析: 必填维度缺失或不可解析 → InvalidRequest
fn parse_params(params: QuoteParams) -> ApiResult<QuoteRequest> {
    if params.country.trim().is_empty()
        || params.level.trim().is_empty()
        || params.service_type.trim().is_empty()
    {
        return Err(ApiError::InvalidRequest(
            "country, level, service_type 为必填项".to_string(),
        ));
    }

    let level = ServiceLevel::parse(&params.level)
        .ok_or_else(|| ApiError::InvalidRequest(format!("无效的服务级别: {}", params.level)))?;
    let service_type = ServiceType::parse(&params.service_type).ok_or_else(|| {
        ApiError::InvalidRequest(format!("无效的服务类型: {}", params.service_type))
    })?;
    if params.distance < 0.0 {
        return Err(ApiError::InvalidRequest(format!(
            "距离不可为负数: {}",
            params.distance
        )));
    }

    Ok(QuoteRequest {
        country: params.country.trim().to_string(),
        level,
        service_type,
        supplier: params
            .supplier
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        distance_km: params.distance,
        out_of_hours: params.out_of_hours,
        weekend: params.weekend,
    })
}

/// 供应商消歧: 限定则精确过滤, 未限定且多供应商则要求消歧
fn select_entry(request: &QuoteRequest, entries: Vec<PriceBookEntry>) -> ApiResult<PriceBookEntry> {
    let key_desc = format!(
        "{} {} {}",
        request.country,
        request.level,
        request.service_type.as_str()
    );

    if let Some(supplier) = &request.supplier {
        return entries
            .into_iter()
            .find(|e| &e.supplier == supplier)
            .ok_or_else(|| ApiError::NotFound(format!("{} (supplier={})", key_desc, supplier)));
    }

    let suppliers: BTreeSet<String> = entries.iter().map(|e| e.supplier.clone()).collect();
    if suppliers.len() > 1 {
        return Err(ApiError::AmbiguousSupplier {
            country: request.country.clone(),
            level: request.level.to_string(),
            service_type: request.service_type.as_str().to_string(),
            candidates: suppliers.into_iter().collect(),
        });
    }

    // find_entries 按 supplier 排序, 取首条即确定性结果
    entries
        .into_iter()
        .next()
        .ok_or(ApiError::NotFound(key_desc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_book::IncidentRates;
    use chrono::Utc;

    fn params(country: &str, level: &str, service_type: &str) -> QuoteParams {
        QuoteParams {
            country: country.to_string(),
            level: level.to_string(),
            service_type: service_type.to_string(),
            ..Default::default()
        }
    }

    fn entry(supplier: &str) -> PriceBookEntry {
        PriceBookEntry {
            entry_id: uuid::Uuid::new_v4().to_string(),
            region: "APAC".to_string(),
            country: "Australia".to_string(),
            supplier: supplier.to_string(),
            currency: "USD".to_string(),
            payment_terms: "45 Days".to_string(),
            level: ServiceLevel::L1,
            service_type: ServiceType::FullDayVisit,
            base_rate: 48000.0,
            incident_rates: IncidentRates::default(),
            additional_hour_rate: None,
            batch_id: "b1".to_string(),
            created_at: Utc::now(),
        }
    }

    fn request(supplier: Option<&str>) -> QuoteRequest {
        QuoteRequest {
            country: "Australia".to_string(),
            level: ServiceLevel::L1,
            service_type: ServiceType::FullDayVisit,
            supplier: supplier.map(|s| s.to_string()),
            distance_km: 0.0,
            out_of_hours: false,
            weekend: false,
        }
    }

    #[test]
    fn test_parse_params_requires_dimensions() {
        let err = parse_params(params("Australia", "", "Full Day Visit (8hrs)")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn test_parse_params_rejects_unknown_level() {
        let err = parse_params(params("Australia", "L9", "Full Day Visit (8hrs)")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn test_parse_params_rejects_negative_distance() {
        let mut p = params("Australia", "L1", "Dispatch Ticket");
        p.distance = -3.0;
        assert!(matches!(
            parse_params(p).unwrap_err(),
            ApiError::InvalidRequest(_)
        ));
    }

    #[test]
    fn test_parse_params_normalizes_inputs() {
        let mut p = params(" Australia ", "l1", "Full Day Visit (8hrs)");
        p.supplier = Some("  ".to_string());
        let request = parse_params(p).unwrap();
        assert_eq!(request.country, "Australia");
        assert_eq!(request.level, ServiceLevel::L1);
        assert_eq!(request.supplier, None); // 空白供应商视同未限定
    }

    #[test]
    fn test_select_entry_empty_is_not_found() {
        let err = select_entry(&request(None), vec![]).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_select_entry_ambiguous_suppliers() {
        let err =
            select_entry(&request(None), vec![entry("Direct"), entry("PartnerCo")]).unwrap_err();
        match err {
            ApiError::AmbiguousSupplier { candidates, .. } => {
                assert_eq!(candidates, vec!["Direct", "PartnerCo"]);
            }
            other => panic!("Expected AmbiguousSupplier, got {:?}", other),
        }
    }

    #[test]
    fn test_select_entry_supplier_filter() {
        let picked = select_entry(
            &request(Some("PartnerCo")),
            vec![entry("Direct"), entry("PartnerCo")],
        )
        .unwrap();
        assert_eq!(picked.supplier, "PartnerCo");

        let err = select_entry(&request(Some("Missing")), vec![entry("Direct")]).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_select_entry_single_supplier_multiple_rows() {
        // 同一供应商多行 (不同批次遗留) 不构成歧义
        let picked = select_entry(&request(None), vec![entry("Direct"), entry("Direct")]).unwrap();
        assert_eq!(picked.supplier, "Direct");
    }
}
