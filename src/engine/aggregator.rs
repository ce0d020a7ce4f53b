// ==========================================
// 食堂集中采购比价系统 - 分组汇总引擎
// ==========================================
// 职责: 将比价矩阵上卷为 区域 -> 品类 -> 供应商 的表现总览
// 口径: 金额统一用基准用量折算（与单行报价的核算用量无关）
// 排序: 品类按名称升序，供应商按编码升序
// ==========================================

use crate::domain::matrix::{
    CategoryOverview, GroupedOverview, RegionOverview, SupplierPerformance, VarianceStat,
};
use crate::engine::matrix_builder::MatrixBuilder;
use std::collections::BTreeMap;

/// 分组累计器（构建期中间结构）
#[derive(Debug, Clone, Default)]
struct PerformanceAccumulator {
    product_count: i64,
    total_base_value: f64,
    total_initial_value: f64,
    total_current_value: f64,
    total_previous_value: f64,
    has_any_previous_data: bool,
}

// ==========================================
// GroupedAggregator - 分组汇总引擎
// ==========================================
pub struct GroupedAggregator;

impl GroupedAggregator {
    /// 创建新的分组汇总引擎
    pub fn new() -> Self {
        Self
    }

    /// 汇总矩阵为分组总览
    ///
    /// 仅统计有有效价的报价；上期金额仅在该供应商存在同商品
    /// 上期核价时累计，has_any_previous_data 标记部分和
    pub fn aggregate(&self, builder: &MatrixBuilder) -> GroupedOverview {
        // category -> supplier_idx -> 累计器
        let mut groups: BTreeMap<String, BTreeMap<usize, PerformanceAccumulator>> =
            BTreeMap::new();

        for row in &builder.products {
            let category = row.product.category.clone();
            let base_quantity = row.product.base_quantity;

            for (supplier_idx, quote) in row.quotes.iter().enumerate() {
                let Some(quote) = quote else { continue };
                if !quote.has_price {
                    continue;
                }
                let Some(current_price) = quote.price_per_unit else { continue };

                let acc = groups
                    .entry(category.clone())
                    .or_default()
                    .entry(supplier_idx)
                    .or_default();

                acc.product_count += 1;
                acc.total_base_value += row.product.base_price * base_quantity;
                acc.total_initial_value += quote.initial_price * base_quantity;
                acc.total_current_value += current_price * base_quantity;

                if let Some(previous) = quote.previous_price {
                    acc.total_previous_value += previous * base_quantity;
                    acc.has_any_previous_data = true;
                }
            }
        }

        let categories = groups
            .into_iter()
            .map(|(category, by_supplier)| {
                // BTreeMap 按 supplier_idx 升序 == 供应商编码升序
                let suppliers = by_supplier
                    .into_iter()
                    .map(|(supplier_idx, acc)| {
                        let record = &builder.suppliers[supplier_idx].record;
                        SupplierPerformance {
                            supplier_id: record.supplier_id.clone(),
                            supplier_code: record.supplier_code.clone(),
                            supplier_name: record.supplier_name.clone(),
                            product_count: acc.product_count,
                            total_base_value: acc.total_base_value,
                            total_initial_value: acc.total_initial_value,
                            total_current_value: acc.total_current_value,
                            total_previous_value: acc.total_previous_value,
                            has_any_previous_data: acc.has_any_previous_data,
                            vs_base: VarianceStat::between(
                                acc.total_current_value,
                                acc.total_base_value,
                            ),
                            vs_initial: VarianceStat::between(
                                acc.total_current_value,
                                acc.total_initial_value,
                            ),
                            vs_previous: VarianceStat::between(
                                acc.total_current_value,
                                acc.total_previous_value,
                            ),
                        }
                    })
                    .collect();

                CategoryOverview {
                    category,
                    suppliers,
                }
            })
            .collect();

        GroupedOverview {
            regions: vec![RegionOverview {
                region: builder.region().to_string(),
                categories,
            }],
        }
    }
}

impl Default for GroupedAggregator {
    fn default() -> Self {
        Self::new()
    }
}
