// ==========================================
// 食堂集中采购比价系统 - 价格历史领域模型
// ==========================================
// 约束: 只追加。核价通过时，每个有正最终价的 (商品, 供应商)
//       精确写入一条记录
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::PriceType;

// ==========================================
// PriceHistoryRecord - 核价历史记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryRecord {
    pub history_id: String,        // 记录ID
    pub product_id: String,        // 商品ID
    pub supplier_id: String,       // 供应商ID
    pub period: String,            // 期次
    pub region: String,            // 区域
    pub price: f64,                // 核价价格
    pub price_type: PriceType,     // 价格类型 (APPROVED)
    pub created_at: NaiveDateTime, // 写入时间
}
