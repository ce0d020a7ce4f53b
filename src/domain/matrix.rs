// ==========================================
// 食堂集中采购比价系统 - 比价矩阵领域模型
// ==========================================
// 职责: 比价查询的派生结果结构，不落库，每次查询重建
// 约束: 由 MatrixBuilder 两阶段构建后整体产出，产出后不可变
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::types::{DemandSource, PriceTrend, QuotationStatus};

// ==========================================
// SupplierQuote - 单元格: 某商品某供应商的报价
// ==========================================
// 约束: 该结构要么不存在（供应商未报该商品），要么完整成形；
//       不存在"半初始化"状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierQuote {
    pub quotation_id: String,            // 来源报价单
    pub supplier_id: String,             // 供应商ID
    pub quotation_status: QuotationStatus, // 报价单状态
    pub quantity: f64,                   // 核算用量 (需求解析结果)
    pub initial_price: f64,              // 初报价
    pub negotiated_price: Option<f64>,   // 议价价
    pub approved_price: Option<f64>,     // 核价价
    pub price_per_unit: Option<f64>,     // 有效单价 (仅正价格时填充)
    pub total_price: Option<f64>,        // 小计 = 单价 × 用量
    pub vat_percentage: f64,             // 增值税率 (%)
    pub vat_amount: Option<f64>,         // 税额
    pub total_with_vat: Option<f64>,     // 含税小计
    pub currency: String,                // 币种
    pub has_price: bool,                 // 是否有有效正价格
    pub has_best_price: bool,            // 是否为该商品最低价
    pub previous_price: Option<f64>,     // 该供应商上一核价期的价格
    pub variance_percentage: Option<f64>,// 相对上期涨跌幅 (%)
    pub trend: Option<PriceTrend>,       // 涨跌趋势
}

// ==========================================
// MatrixProduct - 行: 商品及其供应商报价映射
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixProduct {
    pub product_id: String,              // 商品ID
    pub product_code: String,            // 商品编码
    pub product_name: String,            // 商品名称
    pub unit: String,                    // 计量单位
    pub category: String,                // 品类
    pub base_quantity: f64,              // 基准用量
    pub base_price: f64,                 // 基准价
    pub quantity: f64,                   // 核算用量
    pub quantity_source: DemandSource,   // 用量来源
    pub supplier_quotes: BTreeMap<String, SupplierQuote>, // supplier_id -> 报价
    pub best_supplier_id: Option<String>, // 最低价供应商
    pub best_price: Option<f64>,          // 最低有效单价
    pub previous_approved_price: Option<f64>, // 上一核价期全场最低核价
    pub previous_approved_period: Option<String>, // 上一核价期次
}

// ==========================================
// SupplierSummary - 列: 供应商覆盖统计
// ==========================================
// 比价界面的"参与供应商"列表，带报价单状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierSummary {
    pub supplier_id: String,             // 供应商ID
    pub supplier_code: String,           // 供应商编码
    pub supplier_name: String,           // 供应商名称
    pub quotation_id: String,            // 本期报价单ID
    pub quotation_status: QuotationStatus, // 本期报价单状态
    pub quoted_products: i64,            // 已报商品数
    pub best_price_count: i64,           // 中标(最低价)商品数
}

// ==========================================
// 分组总览 (Region -> Category -> Supplier)
// ==========================================

/// 差异统计: 差额与百分比
///
/// 分母为 0 时百分比取 0
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VarianceStat {
    pub difference: f64, // 差额
    pub percentage: f64, // 百分比 (%)
}

impl VarianceStat {
    /// 由当前值与参考值构造
    pub fn between(current: f64, reference: f64) -> Self {
        let difference = current - reference;
        let percentage = if reference != 0.0 {
            difference / reference * 100.0
        } else {
            0.0
        };
        Self {
            difference,
            percentage,
        }
    }
}

/// 供应商在 (区域, 品类) 分组内的表现汇总
///
/// 金额口径统一用基准用量折算，与单行报价用量无关
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierPerformance {
    pub supplier_id: String,         // 供应商ID
    pub supplier_code: String,       // 供应商编码
    pub supplier_name: String,       // 供应商名称
    pub product_count: i64,          // 已报价商品数
    pub total_base_value: f64,       // Σ 基准价 × 基准用量
    pub total_initial_value: f64,    // Σ 初报价 × 基准用量
    pub total_current_value: f64,    // Σ 有效价 × 基准用量
    pub total_previous_value: f64,   // Σ 上期价 × 基准用量 (仅有上期价的明细)
    pub has_any_previous_data: bool, // 上期汇总是否为部分和
    pub vs_base: VarianceStat,       // 现值相对基准值
    pub vs_initial: VarianceStat,    // 现值相对初报值
    pub vs_previous: VarianceStat,   // 现值相对上期值 (部分和口径)
}

/// 品类分组 (供应商按编码排序)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryOverview {
    pub category: String,                    // 品类
    pub suppliers: Vec<SupplierPerformance>, // 供应商表现 (按编码排序)
}

/// 区域分组 (品类按字母排序)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionOverview {
    pub region: String,                    // 区域
    pub categories: Vec<CategoryOverview>, // 品类分组 (按名称排序)
}

/// 分组总览
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupedOverview {
    pub regions: Vec<RegionOverview>,
}

// ==========================================
// ComparisonMatrix - 比价矩阵
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    pub period: String,                  // 查询期次
    pub region: String,                  // 查询区域
    pub categories: Vec<String>,         // 查询品类 (空表示全部)
    pub products: Vec<MatrixProduct>,    // 商品行
    pub suppliers: Vec<SupplierSummary>, // 参与供应商列
    pub grouped_overview: GroupedOverview, // 分组总览
    pub generated_at: NaiveDateTime,     // 生成时间
}

impl ComparisonMatrix {
    /// 是否为空矩阵（无匹配商品也是合法结果，不是错误）
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance_stat_零分母保护() {
        let v = VarianceStat::between(100.0, 0.0);
        assert_eq!(v.difference, 100.0);
        assert_eq!(v.percentage, 0.0);
    }

    #[test]
    fn test_variance_stat_常规() {
        let v = VarianceStat::between(110.0, 100.0);
        assert_eq!(v.difference, 10.0);
        assert!((v.percentage - 10.0).abs() < 1e-9);
    }
}
