// ==========================================
// 食堂集中采购比价系统 - 历史差异计算引擎
// ==========================================
// 职责: 基于上一核价期次的核价明细，为当前矩阵补充
//       上期参考价与涨跌幅
// 规则: 上一期次 = 同区域内严格小于当前期次且存在已核价
//       报价单的最大期次；不存在时差异数据为空，不是错误
// ==========================================

use crate::domain::types::PriceTrend;
use crate::engine::matrix_builder::MatrixBuilder;
use crate::repository::quotation_repo::PreviousApprovedRecord;
use std::collections::HashMap;

/// 上一核价期次的价格参照
///
/// - `best_by_product`: 商品 -> 全场最低核价
/// - `by_product_supplier`: (商品, 供应商) -> 该供应商自己的核价
///   （输入行按更新时间降序，同键首行生效）
#[derive(Debug, Clone, Default)]
pub struct PreviousPriceData {
    pub period: Option<String>,
    pub best_by_product: HashMap<String, f64>,
    pub by_product_supplier: HashMap<(String, String), f64>,
}

impl PreviousPriceData {
    /// 无历史期次时的空参照
    pub fn empty() -> Self {
        Self::default()
    }
}

// ==========================================
// VarianceCalculator - 历史差异计算引擎
// ==========================================
pub struct VarianceCalculator;

impl VarianceCalculator {
    /// 创建新的历史差异计算引擎
    pub fn new() -> Self {
        Self
    }

    /// 由上一期次核价明细构建价格参照
    ///
    /// # 参数
    /// - `previous_period`: 上一核价期次；None 表示无历史
    /// - `rows`: 该期次的核价明细，更新时间降序
    pub fn build_reference(
        &self,
        previous_period: Option<String>,
        rows: &[PreviousApprovedRecord],
    ) -> PreviousPriceData {
        let Some(period) = previous_period else {
            return PreviousPriceData::empty();
        };

        let mut best_by_product: HashMap<String, f64> = HashMap::new();
        let mut by_product_supplier: HashMap<(String, String), f64> = HashMap::new();

        for row in rows {
            best_by_product
                .entry(row.product_id.clone())
                .and_modify(|best| {
                    if row.price < *best {
                        *best = row.price;
                    }
                })
                .or_insert(row.price);

            // 行序为更新时间降序，首行即该供应商最近一次核价
            by_product_supplier
                .entry((row.product_id.clone(), row.supplier_id.clone()))
                .or_insert(row.price);
        }

        PreviousPriceData {
            period: Some(period),
            best_by_product,
            by_product_supplier,
        }
    }

    /// 将价格参照应用到矩阵
    ///
    /// - 商品行: previous_approved_price 取全场最低核价
    /// - 有效报价: 存在同 (商品, 供应商) 参照时计算涨跌幅与趋势
    pub fn apply(&self, builder: &mut MatrixBuilder, reference: &PreviousPriceData) {
        if reference.period.is_none() {
            return;
        }

        for row in builder.products.iter_mut() {
            let product_id = row.product.product_id.clone();

            if let Some(&best) = reference.best_by_product.get(&product_id) {
                row.previous_approved_price = Some(best);
                row.previous_approved_period = reference.period.clone();
            }

            for quote in row.quotes.iter_mut().flatten() {
                if !quote.has_price {
                    continue;
                }
                let key = (product_id.clone(), quote.supplier_id.clone());
                let Some(&previous) = reference.by_product_supplier.get(&key) else {
                    continue;
                };
                let Some(current) = quote.price_per_unit else { continue };

                quote.previous_price = Some(previous);
                let variance = (current - previous) / previous * 100.0;
                quote.variance_percentage = Some(variance);
                quote.trend = Some(PriceTrend::from_variance_percentage(variance));
            }
        }
    }
}

impl Default for VarianceCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{
        make_product, make_resolved, make_row, make_supplier_record,
    };

    fn record(product_id: &str, supplier_id: &str, price: f64) -> PreviousApprovedRecord {
        PreviousApprovedRecord {
            product_id: product_id.to_string(),
            supplier_id: supplier_id.to_string(),
            price,
        }
    }

    #[test]
    fn test_无历史期次返回空参照() {
        let reference = VarianceCalculator::new().build_reference(None, &[]);
        assert!(reference.period.is_none());
        assert!(reference.best_by_product.is_empty());
    }

    #[test]
    fn test_参照构建_全场最低与同键首行() {
        let rows = vec![
            record("P1", "S1", 100.0), // S1 最近一次核价
            record("P1", "S1", 120.0), // 更早的记录，不生效
            record("P1", "S2", 95.0),
        ];
        let reference =
            VarianceCalculator::new().build_reference(Some("2023-12".to_string()), &rows);

        assert_eq!(reference.best_by_product["P1"], 95.0);
        assert_eq!(
            reference.by_product_supplier[&("P1".to_string(), "S1".to_string())],
            100.0
        );
    }

    #[test]
    fn test_涨跌幅与趋势应用() {
        let products = vec![make_product("P1", "蔬菜")];
        let suppliers = vec![make_supplier_record("S1", "GYS-001")];
        let demands = make_resolved(&[("P1", 10.0)]);
        let mut builder = MatrixBuilder::new("2024-01", "东区", &[], products, suppliers, &demands);
        builder.apply_quote_rows(&[make_row("Q1", "S1", "P1", 110.0, None, None, 0.0)]);

        let calc = VarianceCalculator::new();
        let reference =
            calc.build_reference(Some("2023-12".to_string()), &[record("P1", "S1", 100.0)]);
        calc.apply(&mut builder, &reference);

        let row = &builder.products[0];
        assert_eq!(row.previous_approved_price, Some(100.0));
        assert_eq!(row.previous_approved_period.as_deref(), Some("2023-12"));

        let quote = row.quotes[0].as_ref().unwrap();
        assert_eq!(quote.previous_price, Some(100.0));
        let variance = quote.variance_percentage.unwrap();
        assert!((variance - 10.0).abs() < 1e-9);
        assert_eq!(quote.trend, Some(PriceTrend::Up));
    }

    #[test]
    fn test_无同键参照的报价不计算差异() {
        let products = vec![make_product("P1", "蔬菜")];
        let suppliers = vec![make_supplier_record("S2", "GYS-002")];
        let demands = make_resolved(&[("P1", 10.0)]);
        let mut builder = MatrixBuilder::new("2024-01", "东区", &[], products, suppliers, &demands);
        builder.apply_quote_rows(&[make_row("Q2", "S2", "P1", 110.0, None, None, 0.0)]);

        let calc = VarianceCalculator::new();
        // 历史里只有 S1 的核价
        let reference =
            calc.build_reference(Some("2023-12".to_string()), &[record("P1", "S1", 100.0)]);
        calc.apply(&mut builder, &reference);

        let row = &builder.products[0];
        // 商品级参考价仍取全场最低
        assert_eq!(row.previous_approved_price, Some(100.0));
        // 供应商级差异缺参照，保持未设
        let quote = row.quotes[0].as_ref().unwrap();
        assert_eq!(quote.previous_price, None);
        assert_eq!(quote.variance_percentage, None);
        assert_eq!(quote.trend, None);
    }

    #[test]
    fn test_趋势边界_正负千分之五内持平() {
        let products = vec![make_product("P1", "蔬菜")];
        let suppliers = vec![make_supplier_record("S1", "GYS-001")];
        let demands = make_resolved(&[("P1", 10.0)]);
        let mut builder = MatrixBuilder::new("2024-01", "东区", &[], products, suppliers, &demands);
        // 100.5 相对 100 恰好 +0.5% -> 持平
        builder.apply_quote_rows(&[make_row("Q1", "S1", "P1", 100.5, None, None, 0.0)]);

        let calc = VarianceCalculator::new();
        let reference =
            calc.build_reference(Some("2023-12".to_string()), &[record("P1", "S1", 100.0)]);
        calc.apply(&mut builder, &reference);

        let quote = builder.products[0].quotes[0].as_ref().unwrap();
        assert_eq!(quote.trend, Some(PriceTrend::Stable));
    }
}
