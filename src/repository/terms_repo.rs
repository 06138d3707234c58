// ==========================================
// 全球服务价格手册与报价系统 - 商务条款 Repository
// ==========================================
// 职责: 商务条款单例记录的读写 (trait + rusqlite 实现)
// 约定: 报价路径只读; 记录缺失由调用方以缺省值兜底
// ==========================================

use crate::db::open_and_init;
use crate::domain::terms::TermsConditions;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// TermsRepository Trait
// ==========================================
#[async_trait]
pub trait TermsRepository: Send + Sync {
    /// 读取商务条款单例 (不存在时返回 None, 不报错)
    async fn find_singleton(&self) -> RepositoryResult<Option<TermsConditions>>;

    /// 写入/覆盖商务条款单例
    async fn upsert_singleton(&self, terms: &TermsConditions) -> RepositoryResult<()>;

    /// 单例缺失时播种缺省值 (已存在则不动)
    ///
    /// # 返回
    /// - Ok(true): 本次播种了缺省记录
    /// - Ok(false): 记录已存在
    async fn seed_default_if_missing(&self) -> RepositoryResult<bool>;
}

// ==========================================
// TermsRepositoryImpl
// ==========================================
pub struct TermsRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl TermsRepositoryImpl {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_and_init(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl TermsRepository for TermsRepositoryImpl {
    async fn find_singleton(&self) -> RepositoryResult<Option<TermsConditions>> {
        let conn = self.lock()?;
        let terms = conn
            .query_row(
                r#"
                SELECT service_management_fee_pct, travel_charge_per_km,
                       travel_threshold_km, out_of_hours_multiplier,
                       weekend_holiday_multiplier
                FROM terms_conditions WHERE singleton_id = 1
                "#,
                [],
                |row| {
                    Ok(TermsConditions {
                        service_management_fee_pct: row.get(0)?,
                        travel_charge_per_km: row.get(1)?,
                        travel_threshold_km: row.get(2)?,
                        out_of_hours_multiplier: row.get(3)?,
                        weekend_holiday_multiplier: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(terms)
    }

    async fn upsert_singleton(&self, terms: &TermsConditions) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO terms_conditions (
                singleton_id, service_management_fee_pct, travel_charge_per_km,
                travel_threshold_km, out_of_hours_multiplier, weekend_holiday_multiplier,
                updated_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5, datetime('now'))
            ON CONFLICT(singleton_id) DO UPDATE SET
                service_management_fee_pct = excluded.service_management_fee_pct,
                travel_charge_per_km = excluded.travel_charge_per_km,
                travel_threshold_km = excluded.travel_threshold_km,
                out_of_hours_multiplier = excluded.out_of_hours_multiplier,
                weekend_holiday_multiplier = excluded.weekend_holiday_multiplier,
                updated_at = datetime('now')
            "#,
            params![
                terms.service_management_fee_pct,
                terms.travel_charge_per_km,
                terms.travel_threshold_km,
                terms.out_of_hours_multiplier,
                terms.weekend_holiday_multiplier,
            ],
        )?;
        Ok(())
    }

    async fn seed_default_if_missing(&self) -> RepositoryResult<bool> {
        let defaults = TermsConditions::default();
        let conn = self.lock()?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO terms_conditions (
                singleton_id, service_management_fee_pct, travel_charge_per_km,
                travel_threshold_km, out_of_hours_multiplier, weekend_holiday_multiplier,
                updated_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5, datetime('now'))
            "#,
            params![
                defaults.service_management_fee_pct,
                defaults.travel_charge_per_km,
                defaults.travel_threshold_km,
                defaults.out_of_hours_multiplier,
                defaults.weekend_holiday_multiplier,
            ],
        )?;
        Ok(inserted > 0)
    }
}
