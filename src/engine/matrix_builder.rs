// ==========================================
// 食堂集中采购比价系统 - 比价矩阵构建引擎
// ==========================================
// 职责: 两阶段构建商品×供应商比价网格
//   阶段一: 分配骨架（每个商品行预留全部供应商槽位，计数器清零）
//   阶段二: 合并报价行，计算单价/小计/税额
// 约束: 骨架建成后，任何读取都不会解引用到不存在的商品/供应商，
//       只有"报价存在/缺失"之分；全部变更收敛在 builder 内，
//       finish() 之后产出不可变矩阵
// 约束: 合并阶段单线程执行（取数阶段可并发，见 api 层）
// ==========================================

use crate::domain::matrix::{ComparisonMatrix, GroupedOverview, MatrixProduct, SupplierQuote, SupplierSummary};
use crate::domain::product::Product;
use crate::domain::types::DemandSource;
use crate::engine::demand_resolver::ResolvedDemand;
use crate::repository::quotation_repo::{MatrixSupplierRecord, QuoteRowRecord};
use chrono::Local;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

// ==========================================
// 构建期 arena 结构
// ==========================================
// 字典式嵌套网格改为索引化 arena + 键->下标查找表；
// 供应商槽位按 arena 顺序（供应商编码升序）排列，
// 该顺序同时决定最低价并列时的先到先得

/// 商品行（构建期）
#[derive(Debug, Clone)]
pub(crate) struct ProductRow {
    pub product: Product,                      // 商品主数据快照
    pub quantity: f64,                         // 核算用量
    pub quantity_source: DemandSource,         // 用量来源
    pub quotes: Vec<Option<SupplierQuote>>,    // 供应商槽位 (arena 下标对齐)
    pub best_supplier_id: Option<String>,      // 最低价供应商
    pub best_price: Option<f64>,               // 最低有效单价
    pub previous_approved_price: Option<f64>,  // 上一核价期全场最低核价
    pub previous_approved_period: Option<String>, // 上一核价期次
}

/// 供应商列（构建期）
#[derive(Debug, Clone)]
pub(crate) struct SupplierColumn {
    pub record: MatrixSupplierRecord, // 供应商与本期报价单
    pub quoted_products: i64,         // 已报商品数
    pub best_price_count: i64,        // 中标商品数
}

// ==========================================
// MatrixBuilder - 比价矩阵构建引擎
// ==========================================
pub struct MatrixBuilder {
    period: String,
    region: String,
    categories: Vec<String>,
    pub(crate) products: Vec<ProductRow>,
    pub(crate) suppliers: Vec<SupplierColumn>,
    product_index: HashMap<String, usize>,
    supplier_index: HashMap<String, usize>,
}

impl MatrixBuilder {
    /// 阶段一: 分配骨架
    ///
    /// # 参数
    /// - `products`: 范围内在采商品（决定行序）
    /// - `suppliers`: (期次, 区域) 内有报价单的合作供应商（决定列序与并列裁决顺序）
    /// - `resolved_demands`: 需求量解析结果（product_id -> 用量）
    ///
    /// 零商品时产出显式空矩阵，不是错误
    pub fn new(
        period: &str,
        region: &str,
        categories: &[String],
        products: Vec<Product>,
        suppliers: Vec<MatrixSupplierRecord>,
        resolved_demands: &HashMap<String, ResolvedDemand>,
    ) -> Self {
        let supplier_count = suppliers.len();

        let supplier_index = suppliers
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.supplier_id.clone(), idx))
            .collect();

        let supplier_columns = suppliers
            .into_iter()
            .map(|record| SupplierColumn {
                record,
                quoted_products: 0,
                best_price_count: 0,
            })
            .collect();

        let mut product_index = HashMap::with_capacity(products.len());
        let product_rows = products
            .into_iter()
            .enumerate()
            .map(|(idx, product)| {
                product_index.insert(product.product_id.clone(), idx);
                let resolved = resolved_demands.get(&product.product_id).copied();
                ProductRow {
                    quantity: resolved.map(|r| r.quantity).unwrap_or(1.0),
                    quantity_source: resolved
                        .map(|r| r.source)
                        .unwrap_or(DemandSource::BaseQuantity),
                    quotes: vec![None; supplier_count],
                    best_supplier_id: None,
                    best_price: None,
                    previous_approved_price: None,
                    previous_approved_period: None,
                    product,
                }
            })
            .collect();

        Self {
            period: period.to_string(),
            region: region.to_string(),
            categories: categories.to_vec(),
            products: product_rows,
            suppliers: supplier_columns,
            product_index,
            supplier_index,
        }
    }

    /// 查询区域（分组总览使用）
    pub(crate) fn region(&self) -> &str {
        &self.region
    }

    /// 阶段二: 合并报价行
    ///
    /// 每行: 有效价 = 核价价 ?? 议价价 ?? 初报价；正价格时填充
    /// 单价/小计/税额并置 has_price；供应商已报计数随行递增。
    /// 商品/供应商挂空的行记日志后跳过，不中断整体构建
    /// （并发取数存在时间差，骨架与报价行可能出现快照偏移）。
    pub fn apply_quote_rows(&mut self, rows: &[QuoteRowRecord]) {
        for row in rows {
            let product_idx = match self.product_index.get(&row.product_id) {
                Some(&idx) => idx,
                None => {
                    warn!(
                        product_id = %row.product_id,
                        item_id = %row.item_id,
                        "报价明细挂空: 商品不在比价范围内，已跳过"
                    );
                    continue;
                }
            };
            let supplier_idx = match self.supplier_index.get(&row.supplier_id) {
                Some(&idx) => idx,
                None => {
                    warn!(
                        supplier_id = %row.supplier_id,
                        item_id = %row.item_id,
                        "报价明细挂空: 供应商不在比价范围内，已跳过"
                    );
                    continue;
                }
            };

            let product_row = &mut self.products[product_idx];
            let quantity = product_row.quantity;

            let effective_price = row
                .approved_price
                .or(row.negotiated_price)
                .unwrap_or(row.initial_price);

            let mut quote = SupplierQuote {
                quotation_id: row.quotation_id.clone(),
                supplier_id: row.supplier_id.clone(),
                quotation_status: row.quotation_status,
                quantity,
                initial_price: row.initial_price,
                negotiated_price: row.negotiated_price,
                approved_price: row.approved_price,
                price_per_unit: None,
                total_price: None,
                vat_percentage: row.vat_percentage,
                vat_amount: None,
                total_with_vat: None,
                currency: row.currency.clone(),
                has_price: false,
                has_best_price: false,
                previous_price: None,
                variance_percentage: None,
                trend: None,
            };

            if effective_price > 0.0 {
                let total_price = effective_price * quantity;
                let vat_amount = total_price * row.vat_percentage / 100.0;
                quote.price_per_unit = Some(effective_price);
                quote.total_price = Some(total_price);
                quote.vat_amount = Some(vat_amount);
                quote.total_with_vat = Some(total_price + vat_amount);
                quote.has_price = true;
            }

            product_row.quotes[supplier_idx] = Some(quote);
            self.suppliers[supplier_idx].quoted_products += 1;
        }
    }

    /// 产出不可变矩阵
    ///
    /// 仅当最低价遴选/历史差异/分组总览全部应用完毕后调用
    pub fn finish(self, grouped_overview: GroupedOverview) -> ComparisonMatrix {
        let supplier_ids: Vec<String> = self
            .suppliers
            .iter()
            .map(|c| c.record.supplier_id.clone())
            .collect();

        let products = self
            .products
            .into_iter()
            .map(|row| {
                let mut supplier_quotes = BTreeMap::new();
                for (idx, quote) in row.quotes.into_iter().enumerate() {
                    if let Some(quote) = quote {
                        supplier_quotes.insert(supplier_ids[idx].clone(), quote);
                    }
                }
                MatrixProduct {
                    product_id: row.product.product_id,
                    product_code: row.product.product_code,
                    product_name: row.product.product_name,
                    unit: row.product.unit,
                    category: row.product.category,
                    base_quantity: row.product.base_quantity,
                    base_price: row.product.base_price,
                    quantity: row.quantity,
                    quantity_source: row.quantity_source,
                    supplier_quotes,
                    best_supplier_id: row.best_supplier_id,
                    best_price: row.best_price,
                    previous_approved_price: row.previous_approved_price,
                    previous_approved_period: row.previous_approved_period,
                }
            })
            .collect();

        let suppliers = self
            .suppliers
            .into_iter()
            .map(|c| SupplierSummary {
                supplier_id: c.record.supplier_id,
                supplier_code: c.record.supplier_code,
                supplier_name: c.record.supplier_name,
                quotation_id: c.record.quotation_id,
                quotation_status: c.record.quotation_status,
                quoted_products: c.quoted_products,
                best_price_count: c.best_price_count,
            })
            .collect();

        ComparisonMatrix {
            period: self.period,
            region: self.region,
            categories: self.categories,
            products,
            suppliers,
            grouped_overview,
            generated_at: Local::now().naive_local(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::QuotationStatus;
    use crate::engine::test_support::{
        make_product, make_resolved, make_row, make_supplier_record,
    };

    #[test]
    fn test_骨架分配_每行预留全部供应商槽位() {
        let products = vec![make_product("P1", "蔬菜"), make_product("P2", "蔬菜")];
        let suppliers = vec![
            make_supplier_record("S1", "GYS-001"),
            make_supplier_record("S2", "GYS-002"),
        ];
        let demands = make_resolved(&[("P1", 10.0), ("P2", 5.0)]);

        let builder = MatrixBuilder::new("2024-01", "东区", &[], products, suppliers, &demands);

        assert_eq!(builder.products.len(), 2);
        for row in &builder.products {
            assert_eq!(row.quotes.len(), 2);
            assert!(row.quotes.iter().all(|q| q.is_none()));
        }
        for col in &builder.suppliers {
            assert_eq!(col.quoted_products, 0);
            assert_eq!(col.best_price_count, 0);
        }
    }

    #[test]
    fn test_零商品产出空矩阵() {
        let demands = HashMap::new();
        let builder = MatrixBuilder::new("2024-01", "东区", &[], vec![], vec![], &demands);
        let matrix = builder.finish(GroupedOverview::default());
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_合并报价行_正价格填充完整() {
        let products = vec![make_product("P1", "蔬菜")];
        let suppliers = vec![make_supplier_record("S1", "GYS-001")];
        let demands = make_resolved(&[("P1", 10.0)]);

        let mut builder = MatrixBuilder::new("2024-01", "东区", &[], products, suppliers, &demands);
        builder.apply_quote_rows(&[make_row("Q1", "S1", "P1", 90.0, None, None, 9.0)]);

        let quote = builder.products[0].quotes[0].as_ref().unwrap();
        assert!(quote.has_price);
        assert_eq!(quote.price_per_unit, Some(90.0));
        assert_eq!(quote.total_price, Some(900.0));
        assert_eq!(quote.vat_amount, Some(81.0));
        assert_eq!(quote.total_with_vat, Some(981.0));
        assert_eq!(builder.suppliers[0].quoted_products, 1);
    }

    #[test]
    fn test_合并报价行_议价价覆盖初报价() {
        let products = vec![make_product("P1", "蔬菜")];
        let suppliers = vec![make_supplier_record("S1", "GYS-001")];
        let demands = make_resolved(&[("P1", 10.0)]);

        let mut builder = MatrixBuilder::new("2024-01", "东区", &[], products, suppliers, &demands);
        builder.apply_quote_rows(&[make_row("Q1", "S1", "P1", 90.0, Some(85.0), None, 0.0)]);

        let quote = builder.products[0].quotes[0].as_ref().unwrap();
        assert_eq!(quote.price_per_unit, Some(85.0));
    }

    #[test]
    fn test_非正价格_报价存在但无价() {
        let products = vec![make_product("P1", "蔬菜")];
        let suppliers = vec![make_supplier_record("S1", "GYS-001")];
        let demands = make_resolved(&[("P1", 10.0)]);

        let mut builder = MatrixBuilder::new("2024-01", "东区", &[], products, suppliers, &demands);
        builder.apply_quote_rows(&[make_row("Q1", "S1", "P1", 0.0, None, None, 9.0)]);

        let quote = builder.products[0].quotes[0].as_ref().unwrap();
        assert!(!quote.has_price);
        assert_eq!(quote.price_per_unit, None);
        assert_eq!(quote.total_price, None);
        // 报价行仍计入供应商已报计数
        assert_eq!(builder.suppliers[0].quoted_products, 1);
    }

    #[test]
    fn test_挂空行跳过不中断() {
        let products = vec![make_product("P1", "蔬菜")];
        let suppliers = vec![make_supplier_record("S1", "GYS-001")];
        let demands = make_resolved(&[("P1", 10.0)]);

        let mut builder = MatrixBuilder::new("2024-01", "东区", &[], products, suppliers, &demands);
        builder.apply_quote_rows(&[
            make_row("Q1", "S1", "P-不存在", 90.0, None, None, 9.0),
            make_row("Q1", "S-不存在", "P1", 90.0, None, None, 9.0),
            make_row("Q1", "S1", "P1", 88.0, None, None, 9.0),
        ]);

        // 两条挂空行被跳过，合法行正常合并
        assert_eq!(builder.suppliers[0].quoted_products, 1);
        let quote = builder.products[0].quotes[0].as_ref().unwrap();
        assert_eq!(quote.price_per_unit, Some(88.0));
    }

    #[test]
    fn test_finish_产出映射与状态() {
        let products = vec![make_product("P1", "蔬菜")];
        let suppliers = vec![
            make_supplier_record("S1", "GYS-001"),
            make_supplier_record("S2", "GYS-002"),
        ];
        let demands = make_resolved(&[("P1", 10.0)]);

        let mut builder = MatrixBuilder::new("2024-01", "东区", &[], products, suppliers, &demands);
        builder.apply_quote_rows(&[make_row("Q1", "S1", "P1", 90.0, None, None, 9.0)]);
        let matrix = builder.finish(GroupedOverview::default());

        assert_eq!(matrix.products.len(), 1);
        let product = &matrix.products[0];
        // S1 报价存在且完整成形, S2 缺失
        assert!(product.supplier_quotes.contains_key("S1"));
        assert!(!product.supplier_quotes.contains_key("S2"));
        assert_eq!(matrix.suppliers.len(), 2);
        assert_eq!(matrix.suppliers[0].quotation_status, QuotationStatus::Pending);
    }
}
