// ==========================================
// 食堂集中采购比价系统 - 报价单领域模型
// ==========================================
// 约束: 每个 (supplier_id, period, region) 只允许一张报价单
// 约束: 报价单由外部导入创建，状态只经状态机变更
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::QuotationStatus;

// ==========================================
// Quotation - 报价单
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    pub quotation_id: String,      // 报价单ID
    pub period: String,            // 期次 (形如 2024-01)
    pub region: String,            // 区域
    pub supplier_id: String,       // 供应商ID
    pub status: QuotationStatus,   // 状态
    pub created_at: NaiveDateTime, // 创建时间
    pub updated_at: NaiveDateTime, // 更新时间
}

// ==========================================
// QuoteItem - 报价明细
// ==========================================
// 不变式: 有效价 = approved_price ?? negotiated_price ?? initial_price
// 约束: 价格只向前推进（可补充/覆盖，引擎不清空）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteItem {
    pub item_id: String,                // 明细ID
    pub quotation_id: String,           // 关联报价单
    pub product_id: String,             // 商品ID
    pub quantity: f64,                  // 供应商报量
    pub initial_price: f64,             // 初报价
    pub negotiated_price: Option<f64>,  // 议价价
    pub approved_price: Option<f64>,    // 核价价
    pub vat_percentage: f64,            // 增值税率 (%)
    pub currency: String,               // 币种
    pub created_at: NaiveDateTime,      // 创建时间
    pub updated_at: NaiveDateTime,      // 更新时间
}

impl QuoteItem {
    /// 有效价: 核价价 ?? 议价价 ?? 初报价
    pub fn effective_price(&self) -> f64 {
        self.approved_price
            .or(self.negotiated_price)
            .unwrap_or(self.initial_price)
    }

    /// 核价时的最终价: 覆盖价 ?? 议价价 ?? 初报价
    ///
    /// 返回 None 表示无可用正价格，该明细保持未定价
    pub fn final_price(&self, override_price: Option<f64>) -> Option<f64> {
        let price = override_price
            .or(self.negotiated_price)
            .unwrap_or(self.initial_price);
        if price > 0.0 {
            Some(price)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(initial: f64, negotiated: Option<f64>, approved: Option<f64>) -> QuoteItem {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        QuoteItem {
            item_id: "I1".to_string(),
            quotation_id: "Q1".to_string(),
            product_id: "P1".to_string(),
            quantity: 10.0,
            initial_price: initial,
            negotiated_price: negotiated,
            approved_price: approved,
            vat_percentage: 9.0,
            currency: "CNY".to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_effective_price_优先级() {
        assert_eq!(item(90.0, None, None).effective_price(), 90.0);
        assert_eq!(item(90.0, Some(85.0), None).effective_price(), 85.0);
        assert_eq!(item(90.0, Some(85.0), Some(80.0)).effective_price(), 80.0);
    }

    #[test]
    fn test_final_price_覆盖与兜底() {
        // 覆盖价优先
        assert_eq!(item(90.0, Some(85.0), None).final_price(Some(80.0)), Some(80.0));
        // 无覆盖时取议价价
        assert_eq!(item(90.0, Some(85.0), None).final_price(None), Some(85.0));
        // 无议价时取初报价
        assert_eq!(item(90.0, None, None).final_price(None), Some(90.0));
        // 非正价格视为未定价
        assert_eq!(item(0.0, None, None).final_price(None), None);
    }
}
