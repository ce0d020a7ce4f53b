// ==========================================
// 引擎层测试辅助
// ==========================================
// 职责: 提供引擎单元测试共用的造数函数
// ==========================================

use crate::domain::product::Product;
use crate::domain::types::QuotationStatus;
use crate::engine::demand_resolver::ResolvedDemand;
use crate::domain::types::DemandSource;
use crate::repository::quotation_repo::{MatrixSupplierRecord, QuoteRowRecord};
use chrono::NaiveDate;
use std::collections::HashMap;

pub(crate) fn make_product(product_id: &str, category: &str) -> Product {
    let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    Product {
        product_id: product_id.to_string(),
        product_code: format!("SP-{}", product_id),
        product_name: format!("商品{}", product_id),
        unit: "kg".to_string(),
        category: category.to_string(),
        base_quantity: 20.0,
        base_price: 10.0,
        active: true,
        created_at: ts,
        updated_at: ts,
    }
}

pub(crate) fn make_supplier_record(supplier_id: &str, code: &str) -> MatrixSupplierRecord {
    MatrixSupplierRecord {
        supplier_id: supplier_id.to_string(),
        supplier_code: code.to_string(),
        supplier_name: format!("供应商{}", supplier_id),
        quotation_id: format!("Q-{}", supplier_id),
        quotation_status: QuotationStatus::Pending,
    }
}

pub(crate) fn make_row(
    quotation_id: &str,
    supplier_id: &str,
    product_id: &str,
    initial_price: f64,
    negotiated_price: Option<f64>,
    approved_price: Option<f64>,
    vat_percentage: f64,
) -> QuoteRowRecord {
    QuoteRowRecord {
        quotation_id: quotation_id.to_string(),
        supplier_id: supplier_id.to_string(),
        quotation_status: QuotationStatus::Pending,
        item_id: format!("I-{}-{}", supplier_id, product_id),
        product_id: product_id.to_string(),
        quantity: 1.0,
        initial_price,
        negotiated_price,
        approved_price,
        vat_percentage,
        currency: "CNY".to_string(),
    }
}

pub(crate) fn make_resolved(entries: &[(&str, f64)]) -> HashMap<String, ResolvedDemand> {
    entries
        .iter()
        .map(|(product_id, quantity)| {
            (
                product_id.to_string(),
                ResolvedDemand {
                    quantity: *quantity,
                    source: DemandSource::KitchenDemand,
                },
            )
        })
        .collect()
}
