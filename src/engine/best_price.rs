// ==========================================
// 食堂集中采购比价系统 - 最低价遴选引擎
// ==========================================
// 职责: 在每个商品行的供应商报价中遴选最低有效单价
// 规则: 严格小于比较——并列时先到先得（供应商 arena 顺序），
//       后出现的同价不替换在位者
// ==========================================

use crate::engine::matrix_builder::MatrixBuilder;

// ==========================================
// BestPriceSelector - 最低价遴选引擎
// ==========================================
pub struct BestPriceSelector;

impl BestPriceSelector {
    /// 创建新的最低价遴选引擎
    pub fn new() -> Self {
        Self
    }

    /// 遴选每个商品的最低价供应商
    ///
    /// 有有效价的行: 恰好一个报价被标记 has_best_price，
    /// 且为迭代顺序中首个达到最低价者；无有效价的行两字段保持未设
    pub fn select(&self, builder: &mut MatrixBuilder) {
        for row in builder.products.iter_mut() {
            let mut best_idx: Option<usize> = None;
            let mut best_price = f64::MAX;

            for (idx, quote) in row.quotes.iter().enumerate() {
                let Some(quote) = quote else { continue };
                if !quote.has_price {
                    continue;
                }
                let Some(price) = quote.price_per_unit else { continue };
                if price < best_price {
                    best_price = price;
                    best_idx = Some(idx);
                }
            }

            if let Some(idx) = best_idx {
                if let Some(quote) = row.quotes[idx].as_mut() {
                    quote.has_best_price = true;
                    row.best_supplier_id = Some(quote.supplier_id.clone());
                    row.best_price = Some(best_price);
                }
                builder.suppliers[idx].best_price_count += 1;
            }
        }
    }
}

impl Default for BestPriceSelector {
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

    fn build_two_supplier_matrix(price_a: f64, price_b: f64) -> MatrixBuilder {
        let products = vec![make_product("P1", "蔬菜")];
        let suppliers = vec![
            make_supplier_record("S1", "GYS-001"),
            make_supplier_record("S2", "GYS-002"),
        ];
        let demands = make_resolved(&[("P1", 10.0)]);
        let mut builder = MatrixBuilder::new("2024-01", "东区", &[], products, suppliers, &demands);
        builder.apply_quote_rows(&[
            make_row("Q1", "S1", "P1", price_a, None, None, 0.0),
            make_row("Q2", "S2", "P1", price_b, None, None, 0.0),
        ]);
        builder
    }

    #[test]
    fn test_选取最低有效单价() {
        let mut builder = build_two_supplier_matrix(90.0, 95.0);
        BestPriceSelector::new().select(&mut builder);

        let row = &builder.products[0];
        assert_eq!(row.best_supplier_id.as_deref(), Some("S1"));
        assert_eq!(row.best_price, Some(90.0));
        assert!(row.quotes[0].as_ref().unwrap().has_best_price);
        assert!(!row.quotes[1].as_ref().unwrap().has_best_price);
        assert_eq!(builder.suppliers[0].best_price_count, 1);
        assert_eq!(builder.suppliers[1].best_price_count, 0);
    }

    #[test]
    fn test_并列价先到先得() {
        let mut builder = build_two_supplier_matrix(90.0, 90.0);
        BestPriceSelector::new().select(&mut builder);

        let row = &builder.products[0];
        // S1 在迭代顺序中先出现，后出现的同价不替换
        assert_eq!(row.best_supplier_id.as_deref(), Some("S1"));
        assert!(row.quotes[0].as_ref().unwrap().has_best_price);
        assert!(!row.quotes[1].as_ref().unwrap().has_best_price);

        // 恰好一个中标
        let winners = row
            .quotes
            .iter()
            .flatten()
            .filter(|q| q.has_best_price)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_无有效价时两字段保持未设() {
        let mut builder = build_two_supplier_matrix(0.0, 0.0);
        BestPriceSelector::new().select(&mut builder);

        let row = &builder.products[0];
        assert_eq!(row.best_supplier_id, None);
        assert_eq!(row.best_price, None);
    }
}
