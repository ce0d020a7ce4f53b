// ==========================================
// 食堂集中采购比价系统 - 商品仓储
// ==========================================
// 职责: 商品主数据的只读访问（维护入口在商品管理模块）
// ==========================================

use crate::domain::product::Product;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{build_in_clause, parse_datetime};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductRepository - 商品仓储
// ==========================================
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 创建新的ProductRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按ID查询商品
    pub fn find_by_id(&self, product_id: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            r#"SELECT product_id, product_code, product_name, unit, category,
                      base_quantity, base_price, active, created_at, updated_at
               FROM product
               WHERE product_id = ?"#,
            params![product_id],
            Self::map_row,
        ) {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询在采商品，可按品类集合过滤
    ///
    /// # 参数
    /// - `categories`: 品类集合；空集合表示不过滤
    ///
    /// # 返回
    /// - `Ok(Vec<Product>)`: 按商品编码升序
    pub fn list_active(&self, categories: &[String]) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;

        let base_sql = r#"SELECT product_id, product_code, product_name, unit, category,
                                 base_quantity, base_price, active, created_at, updated_at
                          FROM product
                          WHERE active = 1"#;

        let sql = if categories.is_empty() {
            format!("{} ORDER BY product_code", base_sql)
        } else {
            format!(
                "{} AND {} ORDER BY product_code",
                base_sql,
                build_in_clause("category", categories)
            )
        };

        let mut stmt = conn.prepare(&sql)?;
        let params_vec: Vec<&dyn rusqlite::ToSql> =
            categories.iter().map(|c| c as &dyn rusqlite::ToSql).collect();

        let products = stmt
            .query_map(params_vec.as_slice(), Self::map_row)?
            .collect::<Result<Vec<Product>, _>>()?;

        Ok(products)
    }

    /// 查询在采商品的全部品类（去重，字母序）
    pub fn list_categories(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT DISTINCT category FROM product WHERE active = 1 ORDER BY category",
        )?;

        let categories = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(categories)
    }

    /// 映射数据库行到Product对象
    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Product> {
        Ok(Product {
            product_id: row.get(0)?,
            product_code: row.get(1)?,
            product_name: row.get(2)?,
            unit: row.get(3)?,
            category: row.get(4)?,
            base_quantity: row.get(5)?,
            base_price: row.get(6)?,
            active: row.get::<_, i64>(7)? != 0,
            created_at: parse_datetime(&row.get::<_, String>(8)?, 8)?,
            updated_at: parse_datetime(&row.get::<_, String>(9)?, 9)?,
        })
    }
}
