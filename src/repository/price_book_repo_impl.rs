// ==========================================
// 全球服务价格手册与报价系统 - 价格手册 Repository 实现
// ==========================================
// 存储: SQLite (rusqlite), 连接由 Arc<Mutex<_>> 守护
// 约束: 所有查询使用参数化, 防止 SQL 注入
// ==========================================

use crate::db::open_and_init;
use crate::domain::price_book::{ImportSummary, IncidentRates, PriceBookEntry};
use crate::domain::types::{ServiceLevel, ServiceType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::price_book_repo::PriceBookRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row, ToSql, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

const ENTRY_COLUMNS: &str = "entry_id, region, country, supplier, currency, payment_terms, \
     level, service_type, base_rate, rate_9x5x4, rate_24x7x4, rate_sbd, rate_nbd, \
     rate_2bd, rate_3bd, rate_4bd, rate_additional_hour, additional_hour_rate, \
     batch_id, created_at";

// ==========================================
// PriceBookRepositoryImpl
// ==========================================
pub struct PriceBookRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl PriceBookRepositoryImpl {
    /// 创建新的 Repository 实例 (打开连接并引导 schema)
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_and_init(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 (测试与组合场景使用)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在事务中批量插入条目
    fn insert_entries_tx(tx: &Transaction, entries: &[PriceBookEntry]) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO price_book ({}) VALUES \
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
            ENTRY_COLUMNS
        ))?;

        let mut count = 0;
        for entry in entries {
            stmt.execute(params![
                entry.entry_id,
                entry.region,
                entry.country,
                entry.supplier,
                entry.currency,
                entry.payment_terms,
                entry.level.as_str(),
                entry.service_type.as_str(),
                entry.base_rate,
                entry.incident_rates.nine_five_four,
                entry.incident_rates.twenty_four_seven,
                entry.incident_rates.sbd,
                entry.incident_rates.nbd,
                entry.incident_rates.two_bd,
                entry.incident_rates.three_bd,
                entry.incident_rates.four_bd,
                entry.incident_rates.additional_hour,
                entry.additional_hour_rate,
                entry.batch_id,
                entry.created_at.to_rfc3339(),
            ])?;
            count += 1;
        }

        Ok(count)
    }

    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<PriceBookEntry> {
        let level_raw: String = row.get(6)?;
        let service_type_raw: String = row.get(7)?;
        let created_at_raw: String = row.get(19)?;

        let level = ServiceLevel::parse(&level_raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                rusqlite::types::Type::Text,
                format!("无效的服务级别: {}", level_raw).into(),
            )
        })?;
        let service_type = ServiceType::parse(&service_type_raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                7,
                rusqlite::types::Type::Text,
                format!("无效的服务类型: {}", service_type_raw).into(),
            )
        })?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    19,
                    rusqlite::types::Type::Text,
                    e.to_string().into(),
                )
            })?;

        Ok(PriceBookEntry {
            entry_id: row.get(0)?,
            region: row.get(1)?,
            country: row.get(2)?,
            supplier: row.get(3)?,
            currency: row.get(4)?,
            payment_terms: row.get(5)?,
            level,
            service_type,
            base_rate: row.get(8)?,
            incident_rates: IncidentRates {
                nine_five_four: row.get(9)?,
                twenty_four_seven: row.get(10)?,
                sbd: row.get(11)?,
                nbd: row.get(12)?,
                two_bd: row.get(13)?,
                three_bd: row.get(14)?,
                four_bd: row.get(15)?,
                additional_hour: row.get(16)?,
            },
            additional_hour_rate: row.get(17)?,
            batch_id: row.get(18)?,
            created_at,
        })
    }
}

#[async_trait]
impl PriceBookRepository for PriceBookRepositoryImpl {
    async fn replace_all(&self, entries: Vec<PriceBookEntry>) -> RepositoryResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        // 先清空后插入, 同一事务内完成原子换表
        tx.execute("DELETE FROM price_book", [])?;
        let count = Self::insert_entries_tx(&tx, &entries)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(count)
    }

    async fn find_entries(
        &self,
        country: &str,
        level: ServiceLevel,
        service_type: ServiceType,
    ) -> RepositoryResult<Vec<PriceBookEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM price_book \
             WHERE country = ?1 AND level = ?2 AND service_type = ?3 \
             ORDER BY supplier",
            ENTRY_COLUMNS
        ))?;

        let entries = stmt
            .query_map(
                params![country, level.as_str(), service_type.as_str()],
                Self::row_to_entry,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    async fn list_filtered(
        &self,
        region: Option<&str>,
        country: Option<&str>,
        supplier: Option<&str>,
        limit: usize,
    ) -> RepositoryResult<Vec<PriceBookEntry>> {
        let mut sql = format!("SELECT {} FROM price_book WHERE 1=1", ENTRY_COLUMNS);
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(region) = region {
            args.push(Box::new(region.to_string()));
            sql.push_str(&format!(" AND region = ?{}", args.len()));
        }
        if let Some(country) = country {
            args.push(Box::new(country.to_string()));
            sql.push_str(&format!(" AND country = ?{}", args.len()));
        }
        if let Some(supplier) = supplier {
            args.push(Box::new(supplier.to_string()));
            sql.push_str(&format!(" AND supplier = ?{}", args.len()));
        }
        args.push(Box::new(limit as i64));
        sql.push_str(&format!(
            " ORDER BY region, country, service_type, level LIMIT ?{}",
            args.len()
        ));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn ToSql> = args.iter().map(|b| b.as_ref()).collect();
        let entries = stmt
            .query_map(params_ref.as_slice(), Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<PriceBookEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM price_book ORDER BY region, country, service_type, level",
            ENTRY_COLUMNS
        ))?;

        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    async fn distinct_regions(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT DISTINCT region FROM price_book ORDER BY region")?;
        let regions = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(regions)
    }

    async fn distinct_countries(&self, region: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT country FROM price_book WHERE region = ?1 ORDER BY country",
        )?;
        let countries = stmt
            .query_map(params![region], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(countries)
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM price_book", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    async fn insert_batch(&self, summary: &ImportSummary) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, file_name, total_rows, data_rows, entries,
                skipped_cells, layout_drift_json, report_json, imported_at, elapsed_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                summary.batch_id,
                summary.file_name,
                summary.total_rows as i64,
                summary.data_rows as i64,
                summary.entries as i64,
                summary.skipped_cells as i64,
                serde_json::to_string(&summary.layout_drifts)?,
                serde_json::to_string(&summary.report)?,
                summary.imported_at.to_rfc3339(),
                summary.elapsed_ms as i64,
            ],
        )?;
        Ok(())
    }

    async fn recent_batches(&self, limit: usize) -> RepositoryResult<Vec<ImportSummary>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, file_name, total_rows, data_rows, entries,
                   skipped_cells, layout_drift_json, report_json, imported_at, elapsed_ms
            FROM import_batch ORDER BY imported_at DESC LIMIT ?1
            "#,
        )?;

        let batches = stmt
            .query_map(params![limit as i64], |row| {
                let drift_json: String = row.get(6)?;
                let report_json: String = row.get(7)?;
                let imported_at_raw: String = row.get(8)?;
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                    drift_json,
                    report_json,
                    imported_at_raw,
                    row.get::<_, i64>(9)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut summaries = Vec::with_capacity(batches.len());
        for (
            batch_id,
            file_name,
            total_rows,
            data_rows,
            entries,
            skipped_cells,
            drift_json,
            report_json,
            imported_at_raw,
            elapsed_ms,
        ) in batches
        {
            let imported_at = DateTime::parse_from_rfc3339(&imported_at_raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| RepositoryError::FieldValueError {
                    field: "imported_at".to_string(),
                    message: e.to_string(),
                })?;
            summaries.push(ImportSummary {
                batch_id,
                file_name,
                total_rows: total_rows as usize,
                data_rows: data_rows as usize,
                entries: entries as usize,
                skipped_cells: skipped_cells as usize,
                layout_drifts: serde_json::from_str(&drift_json)?,
                report: serde_json::from_str(&report_json)?,
                imported_at,
                elapsed_ms: elapsed_ms as u64,
            });
        }

        Ok(summaries)
    }
}
