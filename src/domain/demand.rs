// ==========================================
// 食堂集中采购比价系统 - 食堂报量领域模型
// ==========================================
// 职责: 期次内食堂上报的商品需求量，作为基准用量的覆盖项
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::DemandStatus;

// ==========================================
// KitchenPeriodDemand - 食堂期次报量
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenPeriodDemand {
    pub demand_id: String,         // 报量ID
    pub product_id: String,        // 商品ID
    pub period: String,            // 期次
    pub quantity: f64,             // 报量
    pub status: DemandStatus,      // 生效状态
    pub created_at: NaiveDateTime, // 创建时间
    pub updated_at: NaiveDateTime, // 更新时间
}

impl KitchenPeriodDemand {
    /// 判断是否生效
    pub fn is_active(&self) -> bool {
        self.status == DemandStatus::Active
    }
}
