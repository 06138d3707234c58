// ==========================================
// 全球服务价格手册与报价系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout, 减少并发读写时的偶发 busy 错误
// - 内嵌 schema 引导 (本系统仅三张小表, 不引入迁移脚本体系)
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema (幂等)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS price_book (
            entry_id TEXT PRIMARY KEY,
            region TEXT NOT NULL,
            country TEXT NOT NULL,
            supplier TEXT NOT NULL DEFAULT 'Direct',
            currency TEXT NOT NULL DEFAULT '',
            payment_terms TEXT NOT NULL DEFAULT '',
            level TEXT NOT NULL,
            service_type TEXT NOT NULL,
            base_rate REAL NOT NULL,
            rate_9x5x4 REAL,
            rate_24x7x4 REAL,
            rate_sbd REAL,
            rate_nbd REAL,
            rate_2bd REAL,
            rate_3bd REAL,
            rate_4bd REAL,
            rate_additional_hour REAL,
            additional_hour_rate REAL,
            batch_id TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_price_book_lookup
            ON price_book(country, level, service_type);
        CREATE INDEX IF NOT EXISTS idx_price_book_region
            ON price_book(region, country);

        CREATE TABLE IF NOT EXISTS terms_conditions (
            singleton_id INTEGER PRIMARY KEY CHECK (singleton_id = 1),
            service_management_fee_pct REAL NOT NULL,
            travel_charge_per_km REAL NOT NULL,
            travel_threshold_km REAL NOT NULL,
            out_of_hours_multiplier REAL NOT NULL,
            weekend_holiday_multiplier REAL NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS import_batch (
            batch_id TEXT PRIMARY KEY,
            file_name TEXT,
            total_rows INTEGER NOT NULL,
            data_rows INTEGER NOT NULL,
            entries INTEGER NOT NULL,
            skipped_cells INTEGER NOT NULL,
            layout_drift_json TEXT,
            report_json TEXT,
            imported_at TEXT NOT NULL,
            elapsed_ms INTEGER
        );
        "#,
    )
}

/// 打开连接并引导 schema (应用入口使用)
pub fn open_and_init(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 缺省数据库路径 (~/.local/share/global-pricebook/pricebook.db 或平台等价目录)
pub fn default_db_path() -> String {
    let mut path: PathBuf = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("global-pricebook");
    if let Err(e) = std::fs::create_dir_all(&path) {
        tracing::warn!(error = %e, "无法创建数据目录, 回退到当前目录");
        return "pricebook.db".to_string();
    }
    path.push("pricebook.db");
    path.to_string_lossy().to_string()
}
