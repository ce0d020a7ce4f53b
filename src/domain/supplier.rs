// ==========================================
// 食堂集中采购比价系统 - 供应商领域模型
// ==========================================
// 职责: 供应商主数据快照；引擎侧只读
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::SupplierStatus;

// ==========================================
// Supplier - 供应商
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: String,       // 供应商ID
    pub supplier_code: String,     // 供应商编码
    pub supplier_name: String,     // 供应商名称
    pub status: SupplierStatus,    // 合作状态
    pub created_at: NaiveDateTime, // 创建时间
    pub updated_at: NaiveDateTime, // 更新时间
}

impl Supplier {
    /// 判断是否合作中
    pub fn is_active(&self) -> bool {
        self.status == SupplierStatus::Active
    }
}
