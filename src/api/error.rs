// ==========================================
// 食堂集中采购比价系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换仓储/引擎错误为用户友好的错误消息
// 约束: 错误信息必须包含显式原因；"查无数据"是合法结果，不走错误通道
// ==========================================

use crate::engine::lifecycle::LifecycleError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 权限错误
    // ==========================================
    #[error("无权限操作: caller={caller}, 需要角色={required_role}")]
    Unauthorized {
        caller: String,
        required_role: String,
    },

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("报价单已核价，不允许再变更: quotation_id={0}")]
    AlreadyApproved(String),

    #[error("报价单已作废，不允许再变更: quotation_id={0}")]
    AlreadyCancelled(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    /// 批量操作没有命中任何可处理目标
    #[error("没有符合条件的报价单: {0}")]
    EmptyResultSet(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将仓储层的技术错误转换为用户友好的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::BusinessRuleViolation(msg) => ApiError::BusinessRuleViolation(msg),
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 LifecycleError 转换
// ==========================================
impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::AlreadyApproved(id) => ApiError::AlreadyApproved(id),
            LifecycleError::Cancelled(id) => ApiError::AlreadyCancelled(id),
            LifecycleError::InvalidTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::QuotationStatus;
    use crate::engine::lifecycle::QuotationLifecycle;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Quotation".to_string(),
            id: "Q001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Quotation"));
                assert!(msg.contains("Q001"));
            }
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_lifecycle_error_conversion() {
        let err = QuotationLifecycle::ensure_can_approve("Q001", QuotationStatus::Approved)
            .unwrap_err();
        let api_err: ApiError = err.into();
        match api_err {
            ApiError::AlreadyApproved(id) => assert_eq!(id, "Q001"),
            _ => panic!("Expected AlreadyApproved"),
        }

        let err = QuotationLifecycle::ensure_can_approve("Q002", QuotationStatus::Cancelled)
            .unwrap_err();
        let api_err: ApiError = err.into();
        match api_err {
            ApiError::AlreadyCancelled(id) => assert_eq!(id, "Q002"),
            _ => panic!("Expected AlreadyCancelled"),
        }
    }
}
