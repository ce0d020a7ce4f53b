// ==========================================
// 食堂集中采购比价系统 - 报价单生命周期状态机
// ==========================================
// 状态: PENDING(初始) / NEGOTIATION / APPROVED(终态) / CANCELLED(终态)
// 转换:
//   PENDING -> NEGOTIATION        议价（单张或批量）
//   NEGOTIATION -> NEGOTIATION    幂等空转允许
//   PENDING/NEGOTIATION -> APPROVED   核价（需核价权限）
//   PENDING/NEGOTIATION -> CANCELLED  作废（仅状态变更）
//   终态 -> 任意                   拒绝
// ==========================================

use crate::domain::types::QuotationStatus;
use thiserror::Error;

/// 生命周期违规
#[derive(Error, Debug, PartialEq)]
pub enum LifecycleError {
    #[error("报价单已核价，不允许再变更: quotation_id={0}")]
    AlreadyApproved(String),

    #[error("报价单已作废，不允许再变更: quotation_id={0}")]
    Cancelled(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidTransition { from: String, to: String },
}

pub type LifecycleResult = Result<(), LifecycleError>;

// ==========================================
// QuotationLifecycle - 生命周期状态机
// ==========================================
// 红线: 无状态引擎,所有方法都是纯函数
pub struct QuotationLifecycle;

impl QuotationLifecycle {
    /// 校验状态转换是否合法
    pub fn validate_transition(
        quotation_id: &str,
        from: QuotationStatus,
        to: QuotationStatus,
    ) -> LifecycleResult {
        use QuotationStatus::*;

        // 终态报价单一律拒绝，给出可解释的专属原因
        if from.is_terminal() {
            return Err(Self::terminal_violation(quotation_id, from, to));
        }

        match (from, to) {
            (Pending, Negotiation) => Ok(()),
            (Negotiation, Negotiation) => Ok(()), // 幂等空转
            (Pending, Approved) | (Negotiation, Approved) => Ok(()),
            (Pending, Cancelled) | (Negotiation, Cancelled) => Ok(()),
            (from, to) => Err(LifecycleError::InvalidTransition {
                from: from.to_db_str().to_string(),
                to: to.to_db_str().to_string(),
            }),
        }
    }

    /// 校验可转入议价
    pub fn ensure_can_negotiate(quotation_id: &str, status: QuotationStatus) -> LifecycleResult {
        Self::validate_transition(quotation_id, status, QuotationStatus::Negotiation)
    }

    /// 校验可核价
    pub fn ensure_can_approve(quotation_id: &str, status: QuotationStatus) -> LifecycleResult {
        Self::validate_transition(quotation_id, status, QuotationStatus::Approved)
    }

    /// 校验可作废
    pub fn ensure_can_cancel(quotation_id: &str, status: QuotationStatus) -> LifecycleResult {
        Self::validate_transition(quotation_id, status, QuotationStatus::Cancelled)
    }

    fn terminal_violation(
        quotation_id: &str,
        from: QuotationStatus,
        to: QuotationStatus,
    ) -> LifecycleError {
        match from {
            QuotationStatus::Approved => {
                LifecycleError::AlreadyApproved(quotation_id.to_string())
            }
            QuotationStatus::Cancelled => LifecycleError::Cancelled(quotation_id.to_string()),
            _ => LifecycleError::InvalidTransition {
                from: from.to_db_str().to_string(),
                to: to.to_db_str().to_string(),
            },
        }
    }
}
