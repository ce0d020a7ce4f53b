// ==========================================
// 食堂集中采购比价系统 - 需求量解析引擎
// ==========================================
// 职责: 解析期次内每个商品的核算用量
// 红线: 无状态引擎,所有方法都是纯函数
// ==========================================
// 规则: 有生效食堂报量用报量，否则用商品基准用量；
//       结果永不为零（非正值兜底为 1）
// ==========================================

use crate::domain::demand::KitchenPeriodDemand;
use crate::domain::product::Product;
use crate::domain::types::DemandSource;
use std::collections::HashMap;

/// 单个商品的用量解析结果
#[derive(Debug, Clone, Copy)]
pub struct ResolvedDemand {
    pub quantity: f64,         // 核算用量 (恒为正)
    pub source: DemandSource,  // 用量来源
}

// ==========================================
// DemandResolver - 需求量解析引擎
// ==========================================
pub struct DemandResolver;

impl DemandResolver {
    /// 创建新的需求量解析引擎
    pub fn new() -> Self {
        Self
    }

    /// 解析商品集合的核算用量
    ///
    /// # 参数
    /// - `products`: 商品集合
    /// - `demands`: 期次内生效的食堂报量（已按期次/状态过滤）
    ///
    /// # 返回
    /// product_id -> 用量解析结果；每个传入商品必有一条
    pub fn resolve(
        &self,
        products: &[Product],
        demands: &[KitchenPeriodDemand],
    ) -> HashMap<String, ResolvedDemand> {
        let demand_map: HashMap<&str, f64> = demands
            .iter()
            .filter(|d| d.is_active())
            .map(|d| (d.product_id.as_str(), d.quantity))
            .collect();

        products
            .iter()
            .map(|p| {
                let resolved = match demand_map.get(p.product_id.as_str()) {
                    Some(&quantity) => ResolvedDemand {
                        quantity: Self::floor_quantity(quantity),
                        source: DemandSource::KitchenDemand,
                    },
                    None => ResolvedDemand {
                        quantity: Self::floor_quantity(p.base_quantity),
                        source: DemandSource::BaseQuantity,
                    },
                };
                (p.product_id.clone(), resolved)
            })
            .collect()
    }

    /// 用量兜底: 非正值一律取 1
    fn floor_quantity(quantity: f64) -> f64 {
        if quantity > 0.0 {
            quantity
        } else {
            1.0
        }
    }
}

impl Default for DemandResolver {
    fn default() -> Self {
        Self::new()
    }
}
