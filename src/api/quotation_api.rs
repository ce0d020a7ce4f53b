// ==========================================
// 食堂集中采购比价系统 - 报价单操作 API
// ==========================================
// 职责: 议价/核价/作废的生命周期操作与批量入口
// 约束: 批量操作零命中一律报错，不静默成功；
//       核价的三步写入在仓储层同一事务内完成
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::access::AccessControl;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::quotation::{Quotation, QuoteItem};
use crate::domain::types::QuotationStatus;
use crate::engine::lifecycle::QuotationLifecycle;
use crate::i18n;
use crate::repository::quotation_repo::QuotationRepository;

// ==========================================
// 响应结构
// ==========================================

/// 报价单详情（议价界面使用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationDetail {
    pub quotation: Quotation,
    pub items: Vec<QuoteItem>,
}

/// 批量议价响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchNegotiateResponse {
    pub updated_count: usize,            // 实际转入议价的报价单数
    pub affected_suppliers: Vec<String>, // 涉及供应商名称
    pub message: String,                 // 用户可见摘要
}

/// 单张核价响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveOneResponse {
    pub approved_items: usize,       // 定价成功的明细数
    pub total_approved_value: f64,   // Σ 最终价 × 报量
    pub history_rows_written: usize, // 写入的核价历史条数
    pub message: String,             // 用户可见摘要
}

/// 批量核价响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchApproveResponse {
    pub approved_count: usize,           // 实际核价通过的报价单数
    pub affected_suppliers: Vec<String>, // 涉及供应商名称
    pub history_rows_written: usize,     // 写入的核价历史条数
    pub message: String,                 // 用户可见摘要
}

// ==========================================
// QuotationApi - 报价单操作 API
// ==========================================

/// 报价单操作API
///
/// 职责：
/// 1. 生命周期操作（议价/核价/作废，单张与批量）
/// 2. 议价价更新
/// 3. 报价单详情查询
pub struct QuotationApi {
    quotation_repo: Arc<QuotationRepository>,
    access: Arc<dyn AccessControl>,
}

impl QuotationApi {
    /// 创建新的QuotationApi实例
    pub fn new(quotation_repo: Arc<QuotationRepository>, access: Arc<dyn AccessControl>) -> Self {
        Self {
            quotation_repo,
            access,
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 查询报价单详情
    pub fn get_quotation_detail(&self, quotation_id: &str) -> ApiResult<QuotationDetail> {
        let quotation = self.find_quotation(quotation_id)?;
        let items = self.quotation_repo.list_items(quotation_id)?;
        Ok(QuotationDetail { quotation, items })
    }

    // ==========================================
    // 议价
    // ==========================================

    /// 单张转入议价
    ///
    /// PENDING -> NEGOTIATION；已在议价中时为幂等空转
    pub fn negotiate_one(&self, caller_id: &str, quotation_id: &str) -> ApiResult<()> {
        let operator = self.access.require_manager(caller_id)?;

        let quotation = self.find_quotation(quotation_id)?;
        QuotationLifecycle::ensure_can_negotiate(quotation_id, quotation.status)?;

        let updated = self
            .quotation_repo
            .update_status_guarded(quotation_id, QuotationStatus::Negotiation)?;
        if !updated {
            // 校验与写入之间被并发操作转入终态
            return Err(self.stale_transition_error(quotation_id, QuotationStatus::Negotiation));
        }

        info!(
            quotation_id = %quotation_id,
            operator = %operator.staff_id,
            "报价单已转入议价"
        );
        Ok(())
    }

    /// 更新议价价
    ///
    /// 仅限 PENDING/NEGOTIATION 状态的报价单；价格必须为正
    pub fn update_negotiated_price(
        &self,
        caller_id: &str,
        quotation_id: &str,
        product_id: &str,
        price: f64,
    ) -> ApiResult<()> {
        let operator = self.access.require_manager(caller_id)?;

        if price <= 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "议价价必须为正数: {}",
                price
            )));
        }

        let quotation = self.find_quotation(quotation_id)?;
        QuotationLifecycle::ensure_can_negotiate(quotation_id, quotation.status)?;

        let updated =
            self.quotation_repo
                .set_negotiated_price(quotation_id, product_id, price)?;
        if !updated {
            return Err(ApiError::NotFound(format!(
                "报价明细不存在或报价单已进入终态: quotation_id={}, product_id={}",
                quotation_id, product_id
            )));
        }

        info!(
            quotation_id = %quotation_id,
            product_id = %product_id,
            price = price,
            operator = %operator.staff_id,
            "议价价已更新"
        );
        Ok(())
    }

    /// 批量转入议价
    ///
    /// 给定ID中已核价/已作废的部分静默落出生效集合；
    /// 生效集合为空时报错而非静默成功
    pub fn batch_negotiate(
        &self,
        caller_id: &str,
        quotation_ids: &[String],
    ) -> ApiResult<BatchNegotiateResponse> {
        let operator = self.access.require_manager(caller_id)?;

        if quotation_ids.is_empty() {
            return Err(ApiError::InvalidInput("报价单ID列表不能为空".to_string()));
        }

        let outcome = self.quotation_repo.batch_negotiate(quotation_ids)?;
        if outcome.updated_count == 0 {
            return Err(ApiError::EmptyResultSet(i18n::t(
                "quotation.no_eligible_negotiate",
            )));
        }

        info!(
            updated = outcome.updated_count,
            operator = %operator.staff_id,
            "批量议价完成"
        );

        let message = i18n::t_with_args(
            "quotation.batch_negotiated",
            &[("count", &outcome.updated_count.to_string())],
        );
        Ok(BatchNegotiateResponse {
            updated_count: outcome.updated_count,
            affected_suppliers: outcome.affected_suppliers,
            message,
        })
    }

    // ==========================================
    // 核价
    // ==========================================

    /// 单张核价（支持按商品的最终价覆盖）
    ///
    /// # 参数
    /// - `price_overrides`: product_id -> 最终价覆盖；None 表示不覆盖
    ///
    /// # 规则
    /// - 需要核价角色
    /// - 每条明细: 最终价 = 覆盖价 ?? 议价价 ?? 初报价；
    ///   非正价格的明细保持未定价，不写核价历史
    pub fn approve_one(
        &self,
        caller_id: &str,
        quotation_id: &str,
        price_overrides: Option<HashMap<String, f64>>,
    ) -> ApiResult<ApproveOneResponse> {
        let operator = self.access.require_approver(caller_id)?;

        let overrides = price_overrides.unwrap_or_default();
        for (product_id, price) in &overrides {
            if *price <= 0.0 {
                return Err(ApiError::InvalidInput(format!(
                    "覆盖价必须为正数: product_id={}, price={}",
                    product_id, price
                )));
            }
        }

        let quotation = self.find_quotation(quotation_id)?;
        QuotationLifecycle::ensure_can_approve(quotation_id, quotation.status)?;

        let outcome = self.quotation_repo.approve_one(quotation_id, &overrides)?;

        info!(
            quotation_id = %quotation_id,
            approved_items = outcome.approved_items,
            history_rows = outcome.history_rows_written,
            operator = %operator.staff_id,
            "报价单核价完成"
        );

        let message = i18n::t_with_args(
            "quotation.approved_one",
            &[("items", &outcome.approved_items.to_string())],
        );
        Ok(ApproveOneResponse {
            approved_items: outcome.approved_items,
            total_approved_value: outcome.total_approved_value,
            history_rows_written: outcome.history_rows_written,
            message,
        })
    }

    /// 批量核价
    ///
    /// 同一事务内: 批量状态更新 -> 批量价格定稿 -> 批量历史写入；
    /// 批量模式不支持逐条覆盖价
    pub fn approve_many(
        &self,
        caller_id: &str,
        quotation_ids: &[String],
    ) -> ApiResult<BatchApproveResponse> {
        let operator = self.access.require_approver(caller_id)?;

        if quotation_ids.is_empty() {
            return Err(ApiError::InvalidInput("报价单ID列表不能为空".to_string()));
        }

        let outcome = self.quotation_repo.batch_approve(quotation_ids)?;
        if outcome.approved_count == 0 {
            return Err(ApiError::EmptyResultSet(i18n::t(
                "quotation.no_eligible_approve",
            )));
        }

        info!(
            approved = outcome.approved_count,
            history_rows = outcome.history_rows_written,
            operator = %operator.staff_id,
            "批量核价完成"
        );

        let message = i18n::t_with_args(
            "quotation.batch_approved",
            &[("count", &outcome.approved_count.to_string())],
        );
        Ok(BatchApproveResponse {
            approved_count: outcome.approved_count,
            affected_suppliers: outcome.affected_suppliers,
            history_rows_written: outcome.history_rows_written,
            message,
        })
    }

    // ==========================================
    // 作废
    // ==========================================

    /// 单张作废（仅状态变更，不触碰价格与历史）
    pub fn cancel_one(&self, caller_id: &str, quotation_id: &str) -> ApiResult<()> {
        let operator = self.access.require_manager(caller_id)?;

        let quotation = self.find_quotation(quotation_id)?;
        QuotationLifecycle::ensure_can_cancel(quotation_id, quotation.status)?;

        let updated = self
            .quotation_repo
            .update_status_guarded(quotation_id, QuotationStatus::Cancelled)?;
        if !updated {
            return Err(self.stale_transition_error(quotation_id, QuotationStatus::Cancelled));
        }

        info!(
            quotation_id = %quotation_id,
            operator = %operator.staff_id,
            "报价单已作废"
        );
        Ok(())
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn find_quotation(&self, quotation_id: &str) -> ApiResult<Quotation> {
        self.quotation_repo
            .find_by_id(quotation_id)?
            .ok_or_else(|| ApiError::NotFound(format!("报价单{}不存在", quotation_id)))
    }

    /// 校验通过后写入落空（并发转终态），按最新状态给出可解释错误
    fn stale_transition_error(&self, quotation_id: &str, to: QuotationStatus) -> ApiError {
        match self.quotation_repo.find_by_id(quotation_id) {
            Ok(Some(current)) => {
                match QuotationLifecycle::validate_transition(quotation_id, current.status, to) {
                    Err(e) => e.into(),
                    Ok(()) => ApiError::InternalError(format!(
                        "状态更新落空但转换合法: quotation_id={}",
                        quotation_id
                    )),
                }
            }
            Ok(None) => ApiError::NotFound(format!("报价单{}不存在", quotation_id)),
            Err(e) => e.into(),
        }
    }
}
