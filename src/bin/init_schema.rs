// ==========================================
// 食堂集中采购比价系统 - 数据库初始化工具
// ==========================================
// 用法:
//   init_schema [db_path]
// 未指定路径时使用默认数据库路径（CANTEEN_DB_PATH 优先）
// ==========================================

use std::error::Error;

use canteen_procurement::db::{
    default_db_path, init_schema, open_sqlite_connection, read_schema_version,
    CURRENT_SCHEMA_VERSION,
};
use canteen_procurement::logging;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(default_db_path);

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = open_sqlite_connection(&db_path)?;

    let before = read_schema_version(&conn)?;
    init_schema(&conn)?;
    let after = read_schema_version(&conn)?;

    match (before, after) {
        (None, Some(v)) => info!(db_path = %db_path, version = v, "数据库已初始化"),
        (Some(old), Some(new)) if old < new => {
            info!(db_path = %db_path, from = old, to = new, "数据库版本已更新")
        }
        (Some(v), _) if v > CURRENT_SCHEMA_VERSION => {
            warn!(
                db_path = %db_path,
                db_version = v,
                code_version = CURRENT_SCHEMA_VERSION,
                "数据库版本高于当前代码期望，请确认二进制是否过旧"
            )
        }
        _ => info!(db_path = %db_path, version = ?after, "数据库 schema 已是最新"),
    }

    Ok(())
}
