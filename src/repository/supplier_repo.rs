// ==========================================
// 食堂集中采购比价系统 - 供应商仓储
// ==========================================
// 职责: 供应商主数据的只读访问
// ==========================================

use crate::domain::supplier::Supplier;
use crate::domain::types::SupplierStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::parse_datetime;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// SupplierRepository - 供应商仓储
// ==========================================
pub struct SupplierRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SupplierRepository {
    /// 创建新的SupplierRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按ID查询供应商
    pub fn find_by_id(&self, supplier_id: &str) -> RepositoryResult<Option<Supplier>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            r#"SELECT supplier_id, supplier_code, supplier_name, status, created_at, updated_at
               FROM supplier
               WHERE supplier_id = ?"#,
            params![supplier_id],
            Self::map_row,
        ) {
            Ok(supplier) => Ok(Some(supplier)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询合作中的供应商列表，按编码升序
    pub fn list_active(&self) -> RepositoryResult<Vec<Supplier>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT supplier_id, supplier_code, supplier_name, status, created_at, updated_at
               FROM supplier
               WHERE status = 'ACTIVE'
               ORDER BY supplier_code"#,
        )?;

        let suppliers = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<Supplier>, _>>()?;

        Ok(suppliers)
    }

    /// 映射数据库行到Supplier对象
    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Supplier> {
        Ok(Supplier {
            supplier_id: row.get(0)?,
            supplier_code: row.get(1)?,
            supplier_name: row.get(2)?,
            status: SupplierStatus::from_db_str(&row.get::<_, String>(3)?),
            created_at: parse_datetime(&row.get::<_, String>(4)?, 4)?,
            updated_at: parse_datetime(&row.get::<_, String>(5)?, 5)?,
        })
    }
}
