// ==========================================
// 食堂集中采购比价系统 - 价格历史仓储
// ==========================================
// 职责: 核价历史的查询（写入发生在核价事务内, 见 quotation_repo）
// 约束: 只追加，不更新不删除
// ==========================================

use crate::domain::price_history::PriceHistoryRecord;
use crate::domain::types::PriceType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::parse_datetime;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// PriceHistoryRepository - 价格历史仓储
// ==========================================
pub struct PriceHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PriceHistoryRepository {
    /// 创建新的PriceHistoryRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询某期次/区域的全部核价记录
    pub fn list_by_period_region(
        &self,
        period: &str,
        region: &str,
    ) -> RepositoryResult<Vec<PriceHistoryRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT history_id, product_id, supplier_id, period, region,
                      price, price_type, created_at
               FROM price_history
               WHERE period = ? AND region = ?
               ORDER BY product_id, supplier_id"#,
        )?;

        let records = stmt
            .query_map(params![period, region], Self::map_row)?
            .collect::<Result<Vec<PriceHistoryRecord>, _>>()?;

        Ok(records)
    }

    /// 查询某商品的核价轨迹（期次降序）
    pub fn list_by_product(&self, product_id: &str) -> RepositoryResult<Vec<PriceHistoryRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT history_id, product_id, supplier_id, period, region,
                      price, price_type, created_at
               FROM price_history
               WHERE product_id = ?
               ORDER BY period DESC, supplier_id"#,
        )?;

        let records = stmt
            .query_map(params![product_id], Self::map_row)?
            .collect::<Result<Vec<PriceHistoryRecord>, _>>()?;

        Ok(records)
    }

    /// 映射数据库行到PriceHistoryRecord对象
    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<PriceHistoryRecord> {
        let _price_type: String = row.get(6)?;
        Ok(PriceHistoryRecord {
            history_id: row.get(0)?,
            product_id: row.get(1)?,
            supplier_id: row.get(2)?,
            period: row.get(3)?,
            region: row.get(4)?,
            price: row.get(5)?,
            price_type: PriceType::Approved,
            created_at: parse_datetime(&row.get::<_, String>(7)?, 7)?,
        })
    }
}
