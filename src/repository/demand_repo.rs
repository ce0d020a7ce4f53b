// ==========================================
// 食堂集中采购比价系统 - 食堂报量仓储
// ==========================================
// 职责: 期次报量的读取与登记
// ==========================================

use crate::domain::demand::KitchenPeriodDemand;
use crate::domain::types::DemandStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{now_text, parse_datetime, DATETIME_FORMAT};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// KitchenDemandRepository - 食堂报量仓储
// ==========================================
pub struct KitchenDemandRepository {
    conn: Arc<Mutex<Connection>>,
}

impl KitchenDemandRepository {
    /// 创建新的KitchenDemandRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 登记一条期次报量（同 (商品, 期次) 重复登记时覆盖报量）
    pub fn upsert(&self, demand: &KitchenPeriodDemand) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO kitchen_period_demand (
                demand_id, product_id, period, quantity, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(product_id, period)
            DO UPDATE SET quantity = excluded.quantity,
                          status = excluded.status,
                          updated_at = excluded.updated_at"#,
            params![
                &demand.demand_id,
                &demand.product_id,
                &demand.period,
                &demand.quantity,
                demand.status.to_db_str(),
                &demand.created_at.format(DATETIME_FORMAT).to_string(),
                &now_text(),
            ],
        )?;

        Ok(demand.demand_id.clone())
    }

    /// 查询期次内生效的报量
    pub fn list_active_by_period(&self, period: &str) -> RepositoryResult<Vec<KitchenPeriodDemand>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT demand_id, product_id, period, quantity, status, created_at, updated_at
               FROM kitchen_period_demand
               WHERE period = ? AND status = 'ACTIVE'
               ORDER BY product_id"#,
        )?;

        let demands = stmt
            .query_map(params![period], Self::map_row)?
            .collect::<Result<Vec<KitchenPeriodDemand>, _>>()?;

        Ok(demands)
    }

    /// 映射数据库行到KitchenPeriodDemand对象
    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<KitchenPeriodDemand> {
        Ok(KitchenPeriodDemand {
            demand_id: row.get(0)?,
            product_id: row.get(1)?,
            period: row.get(2)?,
            quantity: row.get(3)?,
            status: DemandStatus::from_db_str(&row.get::<_, String>(4)?),
            created_at: parse_datetime(&row.get::<_, String>(5)?, 5)?,
            updated_at: parse_datetime(&row.get::<_, String>(6)?, 6)?,
        })
    }
}
