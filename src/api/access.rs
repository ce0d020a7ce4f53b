// ==========================================
// 食堂集中采购比价系统 - 授权协作方接口
// ==========================================
// 职责: API 层定义授权 trait，角色判定由外部协作方实现
// 说明: 引擎自身不实现任何角色逻辑（依赖倒置）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 通过授权校验的调用者身份
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffIdentity {
    pub staff_id: String, // 员工ID
    pub role: String,     // 判定通过的角色
}

// ==========================================
// AccessControl - 授权协作方 trait
// ==========================================

/// 授权协作方
///
/// - `require_manager`: 议价/作废等日常操作所需角色
/// - `require_approver`: 核价所需的提级角色
pub trait AccessControl: Send + Sync {
    /// 校验调用者具备采购管理角色
    fn require_manager(&self, caller_id: &str) -> ApiResult<StaffIdentity>;

    /// 校验调用者具备核价角色
    fn require_approver(&self, caller_id: &str) -> ApiResult<StaffIdentity>;
}

// ==========================================
// AllowAllAccessControl - 放行实现
// ==========================================
// 用于联调与不启用权限体系的部署
pub struct AllowAllAccessControl;

impl AccessControl for AllowAllAccessControl {
    fn require_manager(&self, caller_id: &str) -> ApiResult<StaffIdentity> {
        Ok(StaffIdentity {
            staff_id: caller_id.to_string(),
            role: "MANAGER".to_string(),
        })
    }

    fn require_approver(&self, caller_id: &str) -> ApiResult<StaffIdentity> {
        Ok(StaffIdentity {
            staff_id: caller_id.to_string(),
            role: "APPROVER".to_string(),
        })
    }
}

// ==========================================
// StaticAccessControl - 静态角色表实现
// ==========================================
// 以内存角色表作为最简授权来源；生产部署可替换为
// 对接人事/权限系统的实现
pub struct StaticAccessControl {
    managers: HashSet<String>,
    approvers: HashSet<String>,
}

impl StaticAccessControl {
    /// 由角色成员列表构造
    pub fn new(managers: Vec<String>, approvers: Vec<String>) -> Self {
        Self {
            managers: managers.into_iter().collect(),
            approvers: approvers.into_iter().collect(),
        }
    }
}

impl AccessControl for StaticAccessControl {
    fn require_manager(&self, caller_id: &str) -> ApiResult<StaffIdentity> {
        // 核价角色默认涵盖管理角色
        if self.managers.contains(caller_id) || self.approvers.contains(caller_id) {
            Ok(StaffIdentity {
                staff_id: caller_id.to_string(),
                role: "MANAGER".to_string(),
            })
        } else {
            Err(ApiError::Unauthorized {
                caller: caller_id.to_string(),
                required_role: "MANAGER".to_string(),
            })
        }
    }

    fn require_approver(&self, caller_id: &str) -> ApiResult<StaffIdentity> {
        if self.approvers.contains(caller_id) {
            Ok(StaffIdentity {
                staff_id: caller_id.to_string(),
                role: "APPROVER".to_string(),
            })
        } else {
            Err(ApiError::Unauthorized {
                caller: caller_id.to_string(),
                required_role: "APPROVER".to_string(),
            })
        }
    }
}
