// ==========================================
// 食堂集中采购比价系统 - 商品领域模型
// ==========================================
// 职责: 商品主数据快照；引擎侧只读，维护由商品管理模块负责
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 商品
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,        // 商品ID
    pub product_code: String,      // 商品编码
    pub product_name: String,      // 商品名称
    pub unit: String,              // 计量单位 (kg/箱/桶)
    pub category: String,          // 品类 (蔬菜/肉类/粮油等)
    pub base_quantity: f64,        // 基准用量 (无食堂报量时采用)
    pub base_price: f64,           // 基准价 (参考价)
    pub active: bool,              // 是否在采
    pub created_at: NaiveDateTime, // 创建时间
    pub updated_at: NaiveDateTime, // 更新时间
}
