// ==========================================
// 食堂集中采购比价系统 - 报价单仓储
// ==========================================
// 职责: 报价单/报价明细的数据访问，比价取数查询，
//       以及议价/核价的事务性批量写入
// 约束: 所有查询参数化；批量核价三步必须同事务提交或整体回滚
// ==========================================

use crate::domain::quotation::{Quotation, QuoteItem};
use crate::domain::types::QuotationStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{build_in_clause, now_text, parse_datetime};
use rusqlite::{params, Connection, ToSql};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// 查询行结构
// ==========================================

/// 比价取数行: (报价单 × 供应商 × 报价明细 × 商品) 联结结果
#[derive(Debug, Clone)]
pub struct QuoteRowRecord {
    pub quotation_id: String,            // 报价单ID
    pub supplier_id: String,             // 供应商ID
    pub quotation_status: QuotationStatus, // 报价单状态
    pub item_id: String,                 // 明细ID
    pub product_id: String,              // 商品ID
    pub quantity: f64,                   // 供应商报量
    pub initial_price: f64,              // 初报价
    pub negotiated_price: Option<f64>,   // 议价价
    pub approved_price: Option<f64>,     // 核价价
    pub vat_percentage: f64,             // 增值税率
    pub currency: String,                // 币种
}

/// 比价矩阵供应商列: 在 (期次, 区域) 内有报价单的合作供应商
#[derive(Debug, Clone)]
pub struct MatrixSupplierRecord {
    pub supplier_id: String,             // 供应商ID
    pub supplier_code: String,           // 供应商编码
    pub supplier_name: String,           // 供应商名称
    pub quotation_id: String,            // 报价单ID
    pub quotation_status: QuotationStatus, // 报价单状态
}

/// 上一核价期次的核价明细行（更新时间降序取出）
#[derive(Debug, Clone)]
pub struct PreviousApprovedRecord {
    pub product_id: String,  // 商品ID
    pub supplier_id: String, // 供应商ID
    pub price: f64,          // 核价价格
}

// ==========================================
// 批量操作结果
// ==========================================

/// 批量议价结果
#[derive(Debug, Clone)]
pub struct BatchNegotiateOutcome {
    pub updated_count: usize,            // 实际转入议价的报价单数
    pub affected_suppliers: Vec<String>, // 涉及供应商名称 (去重升序)
}

/// 批量核价结果
#[derive(Debug, Clone)]
pub struct BatchApproveOutcome {
    pub approved_count: usize,           // 实际核价通过的报价单数
    pub affected_suppliers: Vec<String>, // 涉及供应商名称 (去重升序)
    pub history_rows_written: usize,     // 写入的核价历史条数
}

/// 单张核价结果
#[derive(Debug, Clone)]
pub struct ApproveOutcome {
    pub approved_items: usize,       // 定价成功的明细数
    pub total_approved_value: f64,   // Σ 最终价 × 报量
    pub history_rows_written: usize, // 写入的核价历史条数
}

// ==========================================
// QuotationRepository - 报价单仓储
// ==========================================
pub struct QuotationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl QuotationRepository {
    /// 创建新的QuotationRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 基础查询
    // ==========================================

    /// 按ID查询报价单
    pub fn find_by_id(&self, quotation_id: &str) -> RepositoryResult<Option<Quotation>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            r#"SELECT quotation_id, period, region, supplier_id, status, created_at, updated_at
               FROM quotation
               WHERE quotation_id = ?"#,
            params![quotation_id],
            Self::map_quotation_row,
        ) {
            Ok(q) => Ok(Some(q)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询报价单全部明细，按商品ID升序
    pub fn list_items(&self, quotation_id: &str) -> RepositoryResult<Vec<QuoteItem>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT item_id, quotation_id, product_id, quantity, initial_price,
                      negotiated_price, approved_price, vat_percentage, currency,
                      created_at, updated_at
               FROM quote_item
               WHERE quotation_id = ?
               ORDER BY product_id"#,
        )?;

        let items = stmt
            .query_map(params![quotation_id], Self::map_item_row)?
            .collect::<Result<Vec<QuoteItem>, _>>()?;

        Ok(items)
    }

    // ==========================================
    // 比价取数查询
    // ==========================================

    /// 比价取数: 期次/区域/品类范围内的联结行
    ///
    /// 过滤条件:
    /// - 报价单非作废
    /// - 供应商合作中
    /// - 商品在采且命中品类集合（空集合表示全部品类）
    pub fn quote_rows(
        &self,
        period: &str,
        region: &str,
        categories: &[String],
    ) -> RepositoryResult<Vec<QuoteRowRecord>> {
        let conn = self.get_conn()?;

        let base_sql = r#"SELECT q.quotation_id, q.supplier_id, q.status,
                                 i.item_id, i.product_id, i.quantity, i.initial_price,
                                 i.negotiated_price, i.approved_price, i.vat_percentage, i.currency
                          FROM quotation q
                          JOIN quote_item i ON i.quotation_id = q.quotation_id
                          JOIN supplier s ON s.supplier_id = q.supplier_id AND s.status = 'ACTIVE'
                          JOIN product p ON p.product_id = i.product_id AND p.active = 1
                          WHERE q.period = ? AND q.region = ? AND q.status != 'CANCELLED'"#;

        let sql = if categories.is_empty() {
            format!("{} ORDER BY i.product_id, q.supplier_id", base_sql)
        } else {
            format!(
                "{} AND {} ORDER BY i.product_id, q.supplier_id",
                base_sql,
                build_in_clause("p.category", categories)
            )
        };

        let mut stmt = conn.prepare(&sql)?;
        let mut params_vec: Vec<&dyn ToSql> = vec![&period, &region];
        for c in categories {
            params_vec.push(c);
        }

        let rows = stmt
            .query_map(params_vec.as_slice(), |row| {
                Ok(QuoteRowRecord {
                    quotation_id: row.get(0)?,
                    supplier_id: row.get(1)?,
                    quotation_status: QuotationStatus::from_db_str(&row.get::<_, String>(2)?),
                    item_id: row.get(3)?,
                    product_id: row.get(4)?,
                    quantity: row.get(5)?,
                    initial_price: row.get(6)?,
                    negotiated_price: row.get(7)?,
                    approved_price: row.get(8)?,
                    vat_percentage: row.get(9)?,
                    currency: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<QuoteRowRecord>, _>>()?;

        Ok(rows)
    }

    /// 比价矩阵供应商列: (期次, 区域) 内有报价单的合作供应商，按编码升序
    pub fn matrix_suppliers(
        &self,
        period: &str,
        region: &str,
    ) -> RepositoryResult<Vec<MatrixSupplierRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT s.supplier_id, s.supplier_code, s.supplier_name, q.quotation_id, q.status
               FROM supplier s
               JOIN quotation q ON q.supplier_id = s.supplier_id
               WHERE q.period = ? AND q.region = ? AND s.status = 'ACTIVE'
               ORDER BY s.supplier_code"#,
        )?;

        let suppliers = stmt
            .query_map(params![period, region], |row| {
                Ok(MatrixSupplierRecord {
                    supplier_id: row.get(0)?,
                    supplier_code: row.get(1)?,
                    supplier_name: row.get(2)?,
                    quotation_id: row.get(3)?,
                    quotation_status: QuotationStatus::from_db_str(&row.get::<_, String>(4)?),
                })
            })?
            .collect::<Result<Vec<MatrixSupplierRecord>, _>>()?;

        Ok(suppliers)
    }

    /// 上一核价期次: 同区域内严格小于当前期次、且存在已核价报价单的最大期次
    pub fn previous_approved_period(
        &self,
        period: &str,
        region: &str,
    ) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let prev: Option<String> = conn.query_row(
            r#"SELECT MAX(period) FROM quotation
               WHERE region = ? AND status = 'APPROVED' AND period < ?"#,
            params![region, period],
            |row| row.get(0),
        )?;

        Ok(prev)
    }

    /// 上一核价期次的核价明细（更新时间降序，供"同键首行生效"的去重规则使用）
    pub fn previous_approved_rows(
        &self,
        previous_period: &str,
        region: &str,
        categories: &[String],
    ) -> RepositoryResult<Vec<PreviousApprovedRecord>> {
        let conn = self.get_conn()?;

        let base_sql = r#"SELECT i.product_id, q.supplier_id, i.approved_price
                          FROM quotation q
                          JOIN quote_item i ON i.quotation_id = q.quotation_id
                          JOIN product p ON p.product_id = i.product_id
                          WHERE q.period = ? AND q.region = ? AND q.status = 'APPROVED'
                            AND i.approved_price IS NOT NULL AND i.approved_price > 0"#;

        let sql = if categories.is_empty() {
            format!("{} ORDER BY i.updated_at DESC, i.item_id", base_sql)
        } else {
            format!(
                "{} AND {} ORDER BY i.updated_at DESC, i.item_id",
                base_sql,
                build_in_clause("p.category", categories)
            )
        };

        let mut stmt = conn.prepare(&sql)?;
        let mut params_vec: Vec<&dyn ToSql> = vec![&previous_period, &region];
        for c in categories {
            params_vec.push(c);
        }

        let rows = stmt
            .query_map(params_vec.as_slice(), |row| {
                Ok(PreviousApprovedRecord {
                    product_id: row.get(0)?,
                    supplier_id: row.get(1)?,
                    price: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<PreviousApprovedRecord>, _>>()?;

        Ok(rows)
    }

    // ==========================================
    // 筛选项查询（作废报价单一律排除）
    // ==========================================

    /// 全部期次（去重，降序）
    pub fn list_periods(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT DISTINCT period FROM quotation WHERE status != 'CANCELLED' ORDER BY period DESC",
        )?;

        let periods = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(periods)
    }

    /// 期次内的区域（去重，升序）
    pub fn list_regions(&self, period: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT DISTINCT region FROM quotation
               WHERE period = ? AND status != 'CANCELLED'
               ORDER BY region"#,
        )?;

        let regions = stmt
            .query_map(params![period], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(regions)
    }

    /// (期次, 区域) 内可比价的品类（去重，升序）
    pub fn list_categories(&self, period: &str, region: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT DISTINCT p.category
               FROM quotation q
               JOIN quote_item i ON i.quotation_id = q.quotation_id
               JOIN product p ON p.product_id = i.product_id
               WHERE q.period = ? AND q.region = ? AND q.status != 'CANCELLED'
               ORDER BY p.category"#,
        )?;

        let categories = stmt
            .query_map(params![period, region], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(categories)
    }

    // ==========================================
    // 状态与价格写入
    // ==========================================

    /// 带状态守卫的单张状态更新
    ///
    /// 仅当当前状态为 PENDING/NEGOTIATION 时生效（守卫写在同一条 UPDATE 内，
    /// 避免"读-判-写"间隙的并发竞争）
    ///
    /// # 返回
    /// - `Ok(true)`: 状态已更新
    /// - `Ok(false)`: 报价单不满足守卫条件，未更新
    pub fn update_status_guarded(
        &self,
        quotation_id: &str,
        to: QuotationStatus,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"UPDATE quotation SET status = ?, updated_at = ?
               WHERE quotation_id = ? AND status IN ('PENDING', 'NEGOTIATION')"#,
            params![to.to_db_str(), now_text(), quotation_id],
        )?;

        Ok(affected > 0)
    }

    /// 更新议价价（仅限 PENDING/NEGOTIATION 状态的报价单）
    ///
    /// # 返回
    /// - `Ok(true)`: 明细已更新
    /// - `Ok(false)`: 明细不存在或报价单已进入终态
    pub fn set_negotiated_price(
        &self,
        quotation_id: &str,
        product_id: &str,
        price: f64,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"UPDATE quote_item SET negotiated_price = ?, updated_at = ?
               WHERE product_id = ?
                 AND quotation_id IN (
                     SELECT quotation_id FROM quotation
                     WHERE quotation_id = ? AND status IN ('PENDING', 'NEGOTIATION')
                 )"#,
            params![price, now_text(), product_id, quotation_id],
        )?;

        Ok(affected > 0)
    }

    // ==========================================
    // 批量议价
    // ==========================================

    /// 批量转入议价
    ///
    /// 给定报价单ID集合，过滤出当前为 PENDING/NEGOTIATION 的部分批量置为
    /// NEGOTIATION。已核价/已作废的ID静默落出生效集合。
    ///
    /// # 返回
    /// 实际更新数与涉及供应商名称；空生效集合返回 updated_count=0，
    /// 由 API 层转换为用户可见错误
    pub fn batch_negotiate(&self, quotation_ids: &[String]) -> RepositoryResult<BatchNegotiateOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let (eligible_ids, affected_suppliers) =
            Self::eligible_quotations(&tx, quotation_ids)?;

        if eligible_ids.is_empty() {
            // 无生效目标，不产生任何写入
            return Ok(BatchNegotiateOutcome {
                updated_count: 0,
                affected_suppliers: Vec::new(),
            });
        }

        // 同一条 UPDATE 内再次按当前状态过滤，避免与并发核价互踩
        let update_sql = format!(
            "UPDATE quotation SET status = 'NEGOTIATION', updated_at = ? \
             WHERE {} AND status IN ('PENDING', 'NEGOTIATION')",
            build_in_clause("quotation_id", &eligible_ids)
        );
        let now = now_text();
        let mut params_vec: Vec<&dyn ToSql> = vec![&now];
        for id in &eligible_ids {
            params_vec.push(id);
        }
        let updated_count = tx.execute(&update_sql, params_vec.as_slice())?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(BatchNegotiateOutcome {
            updated_count,
            affected_suppliers,
        })
    }

    // ==========================================
    // 核价（单张）
    // ==========================================

    /// 核价单张报价单（同一事务内: 状态更新 + 价格定稿 + 历史写入）
    ///
    /// # 参数
    /// - `quotation_id`: 报价单ID
    /// - `price_overrides`: 按商品ID的最终价覆盖（仅单张核价支持）
    ///
    /// # 规则
    /// - 事务内复核状态，终态报价单返回 InvalidStateTransition
    /// - 每条明细: 最终价 = 覆盖价 ?? 议价价 ?? 初报价；非正价格的明细
    ///   保持未定价且不写历史，报价单整体仍转为 APPROVED
    pub fn approve_one(
        &self,
        quotation_id: &str,
        price_overrides: &HashMap<String, f64>,
    ) -> RepositoryResult<ApproveOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        // 事务内复核当前状态
        let quotation = match tx
            .query_row(
                r#"SELECT quotation_id, period, region, supplier_id, status, created_at, updated_at
                   FROM quotation WHERE quotation_id = ?"#,
                params![quotation_id],
                Self::map_quotation_row,
            ) {
            Ok(q) => q,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(RepositoryError::NotFound {
                    entity: "Quotation".to_string(),
                    id: quotation_id.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        if quotation.status.is_terminal() {
            return Err(RepositoryError::InvalidStateTransition {
                from: quotation.status.to_db_str().to_string(),
                to: QuotationStatus::Approved.to_db_str().to_string(),
            });
        }

        let now = now_text();
        tx.execute(
            "UPDATE quotation SET status = 'APPROVED', updated_at = ? WHERE quotation_id = ?",
            params![now, quotation_id],
        )?;

        // 逐条定稿明细价格并写入核价历史
        let items: Vec<(String, String, f64, f64, Option<f64>)> = {
            let mut stmt = tx.prepare(
                r#"SELECT item_id, product_id, quantity, initial_price, negotiated_price
                   FROM quote_item WHERE quotation_id = ? ORDER BY product_id"#,
            )?;
            let rows = stmt
                .query_map(params![quotation_id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, Option<f64>>(4)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let mut outcome = ApproveOutcome {
            approved_items: 0,
            total_approved_value: 0.0,
            history_rows_written: 0,
        };

        for (item_id, product_id, quantity, initial_price, negotiated_price) in items {
            let final_price = price_overrides
                .get(&product_id)
                .copied()
                .or(negotiated_price)
                .unwrap_or(initial_price);

            if final_price <= 0.0 {
                // 无可用正价格，保持未定价
                continue;
            }

            tx.execute(
                "UPDATE quote_item SET approved_price = ?, updated_at = ? WHERE item_id = ?",
                params![final_price, now, item_id],
            )?;

            tx.execute(
                r#"INSERT INTO price_history (
                    history_id, product_id, supplier_id, period, region,
                    price, price_type, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, 'APPROVED', ?)"#,
                params![
                    Uuid::new_v4().to_string(),
                    product_id,
                    quotation.supplier_id,
                    quotation.period,
                    quotation.region,
                    final_price,
                    now,
                ],
            )?;

            outcome.approved_items += 1;
            outcome.total_approved_value += final_price * quantity;
            outcome.history_rows_written += 1;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(outcome)
    }

    // ==========================================
    // 核价（批量）
    // ==========================================

    /// 批量核价（同一事务内三步: 批量状态更新 -> 批量价格定稿 -> 批量历史写入）
    ///
    /// # 规则
    /// - 生效集合 = 给定ID中当前为 PENDING/NEGOTIATION 的部分；
    ///   并发核价下已转终态的ID静默落出，不重复处理
    /// - 批量模式不支持逐条覆盖价: approved_price = 议价价 ?? 初报价
    /// - 仅正最终价写入 price_history（每条明细至多一条）
    /// - 三步任一失败则整体回滚，外部不可能观察到
    ///   "status=APPROVED 但 approved_price 未定"的中间态
    pub fn batch_approve(&self, quotation_ids: &[String]) -> RepositoryResult<BatchApproveOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let (eligible_ids, affected_suppliers) =
            Self::eligible_quotations(&tx, quotation_ids)?;

        if eligible_ids.is_empty() {
            return Ok(BatchApproveOutcome {
                approved_count: 0,
                affected_suppliers: Vec::new(),
                history_rows_written: 0,
            });
        }

        let now = now_text();

        // 第一步: 批量状态更新（同一条 UPDATE 内按当前状态复核）
        let status_sql = format!(
            "UPDATE quotation SET status = 'APPROVED', updated_at = ? \
             WHERE {} AND status IN ('PENDING', 'NEGOTIATION')",
            build_in_clause("quotation_id", &eligible_ids)
        );
        let mut params_vec: Vec<&dyn ToSql> = vec![&now];
        for id in &eligible_ids {
            params_vec.push(id);
        }
        let approved_count = tx.execute(&status_sql, params_vec.as_slice())?;

        // 第二步: 批量价格定稿 approved_price = 议价价 ?? 初报价（仅正价格）
        let finalize_sql = format!(
            "UPDATE quote_item \
             SET approved_price = COALESCE(negotiated_price, initial_price), updated_at = ? \
             WHERE {} AND COALESCE(negotiated_price, initial_price) > 0",
            build_in_clause("quotation_id", &eligible_ids)
        );
        let mut params_vec: Vec<&dyn ToSql> = vec![&now];
        for id in &eligible_ids {
            params_vec.push(id);
        }
        tx.execute(&finalize_sql, params_vec.as_slice())?;

        // 第三步: 重算最终价并批量写入核价历史
        let history_rows: Vec<(String, String, String, String, f64)> = {
            let select_sql = format!(
                "SELECT i.product_id, q.supplier_id, q.period, q.region, i.approved_price \
                 FROM quote_item i \
                 JOIN quotation q ON q.quotation_id = i.quotation_id \
                 WHERE {} AND i.approved_price IS NOT NULL AND i.approved_price > 0",
                build_in_clause("i.quotation_id", &eligible_ids)
            );
            let mut stmt = tx.prepare(&select_sql)?;
            let params_vec: Vec<&dyn ToSql> =
                eligible_ids.iter().map(|id| id as &dyn ToSql).collect();
            let rows = stmt
                .query_map(params_vec.as_slice(), |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, f64>(4)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let mut history_rows_written = 0;
        for (product_id, supplier_id, period, region, price) in history_rows {
            tx.execute(
                r#"INSERT INTO price_history (
                    history_id, product_id, supplier_id, period, region,
                    price, price_type, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, 'APPROVED', ?)"#,
                params![
                    Uuid::new_v4().to_string(),
                    product_id,
                    supplier_id,
                    period,
                    region,
                    price,
                    now,
                ],
            )?;
            history_rows_written += 1;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(BatchApproveOutcome {
            approved_count,
            affected_suppliers,
            history_rows_written,
        })
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    /// 事务内筛选生效报价单: 给定ID中当前为 PENDING/NEGOTIATION 的部分
    ///
    /// # 返回
    /// - 生效报价单ID列表与涉及供应商名称（去重升序）
    fn eligible_quotations(
        tx: &rusqlite::Transaction,
        quotation_ids: &[String],
    ) -> RepositoryResult<(Vec<String>, Vec<String>)> {
        if quotation_ids.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let sql = format!(
            "SELECT q.quotation_id, s.supplier_name \
             FROM quotation q \
             JOIN supplier s ON s.supplier_id = q.supplier_id \
             WHERE {} AND q.status IN ('PENDING', 'NEGOTIATION')",
            build_in_clause("q.quotation_id", quotation_ids)
        );

        let mut stmt = tx.prepare(&sql)?;
        let params_vec: Vec<&dyn ToSql> =
            quotation_ids.iter().map(|id| id as &dyn ToSql).collect();

        let mut eligible_ids = Vec::new();
        let mut supplier_names = BTreeSet::new();
        let rows = stmt.query_map(params_vec.as_slice(), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (id, name) = row?;
            eligible_ids.push(id);
            supplier_names.insert(name);
        }

        Ok((eligible_ids, supplier_names.into_iter().collect()))
    }

    /// 映射数据库行到Quotation对象
    fn map_quotation_row(row: &rusqlite::Row) -> rusqlite::Result<Quotation> {
        Ok(Quotation {
            quotation_id: row.get(0)?,
            period: row.get(1)?,
            region: row.get(2)?,
            supplier_id: row.get(3)?,
            status: QuotationStatus::from_db_str(&row.get::<_, String>(4)?),
            created_at: parse_datetime(&row.get::<_, String>(5)?, 5)?,
            updated_at: parse_datetime(&row.get::<_, String>(6)?, 6)?,
        })
    }

    /// 映射数据库行到QuoteItem对象
    fn map_item_row(row: &rusqlite::Row) -> rusqlite::Result<QuoteItem> {
        Ok(QuoteItem {
            item_id: row.get(0)?,
            quotation_id: row.get(1)?,
            product_id: row.get(2)?,
            quantity: row.get(3)?,
            initial_price: row.get(4)?,
            negotiated_price: row.get(5)?,
            approved_price: row.get(6)?,
            vat_percentage: row.get(7)?,
            currency: row.get(8)?,
            created_at: parse_datetime(&row.get::<_, String>(9)?, 9)?,
            updated_at: parse_datetime(&row.get::<_, String>(10)?, 10)?,
        })
    }
}
