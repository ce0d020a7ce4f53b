// ==========================================
// 食堂集中采购比价系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供建表入口，供 init_schema 工具与测试共用
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 说明：
/// - 版本号用于**提示/告警**（不做自动迁移），避免静默在旧库上运行导致隐性错误。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 默认数据库文件名
pub const DEFAULT_DB_FILE: &str = "canteen_procurement.db";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
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

/// 默认数据库路径（用户数据目录下）
///
/// 环境变量 CANTEEN_DB_PATH 优先；否则落在用户数据目录，
/// 两者都不可用时退回当前目录。
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var("CANTEEN_DB_PATH") {
        if !path.trim().is_empty() {
            return path;
        }
    }

    let mut dir: PathBuf = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push("canteen-procurement");
    dir.push(DEFAULT_DB_FILE);
    dir.to_string_lossy().to_string()
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化数据库 schema（幂等）
///
/// 表结构约束:
/// - quotation: 每个 (supplier_id, period, region) 只允许一张报价单
/// - quote_item: 每张报价单内每个商品只允许一条明细
/// - price_history: 每个 (product_id, supplier_id, period, region) 只允许一条核价记录
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS product (
            product_id TEXT PRIMARY KEY,
            product_code TEXT NOT NULL UNIQUE,
            product_name TEXT NOT NULL,
            unit TEXT NOT NULL,
            category TEXT NOT NULL,
            base_quantity REAL NOT NULL DEFAULT 1,
            base_price REAL NOT NULL DEFAULT 0,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS supplier (
            supplier_id TEXT PRIMARY KEY,
            supplier_code TEXT NOT NULL UNIQUE,
            supplier_name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'ACTIVE',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS quotation (
            quotation_id TEXT PRIMARY KEY,
            period TEXT NOT NULL,
            region TEXT NOT NULL,
            supplier_id TEXT NOT NULL REFERENCES supplier(supplier_id),
            status TEXT NOT NULL DEFAULT 'PENDING',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(supplier_id, period, region)
        );

        CREATE TABLE IF NOT EXISTS quote_item (
            item_id TEXT PRIMARY KEY,
            quotation_id TEXT NOT NULL REFERENCES quotation(quotation_id) ON DELETE CASCADE,
            product_id TEXT NOT NULL REFERENCES product(product_id),
            quantity REAL NOT NULL DEFAULT 0,
            initial_price REAL NOT NULL DEFAULT 0,
            negotiated_price REAL,
            approved_price REAL,
            vat_percentage REAL NOT NULL DEFAULT 0,
            currency TEXT NOT NULL DEFAULT 'CNY',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(quotation_id, product_id)
        );

        CREATE TABLE IF NOT EXISTS kitchen_period_demand (
            demand_id TEXT PRIMARY KEY,
            product_id TEXT NOT NULL REFERENCES product(product_id),
            period TEXT NOT NULL,
            quantity REAL NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'ACTIVE',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(product_id, period)
        );

        CREATE TABLE IF NOT EXISTS price_history (
            history_id TEXT PRIMARY KEY,
            product_id TEXT NOT NULL,
            supplier_id TEXT NOT NULL,
            period TEXT NOT NULL,
            region TEXT NOT NULL,
            price REAL NOT NULL,
            price_type TEXT NOT NULL DEFAULT 'APPROVED',
            created_at TEXT NOT NULL,
            UNIQUE(product_id, supplier_id, period, region)
        );

        CREATE INDEX IF NOT EXISTS idx_quotation_period_region
            ON quotation(period, region, status);
        CREATE INDEX IF NOT EXISTS idx_quote_item_quotation
            ON quote_item(quotation_id);
        CREATE INDEX IF NOT EXISTS idx_price_history_product
            ON price_history(product_id, supplier_id, period);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_幂等() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        // 重复执行不报错
        init_schema(&conn).unwrap();

        let version = read_schema_version(&conn).unwrap();
        assert_eq!(version, Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_schema_version_表不存在时返回none() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
    }
}
