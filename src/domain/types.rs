// ==========================================
// 食堂集中采购比价系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 报价单状态 (Quotation Status)
// ==========================================
// 状态机: PENDING -> NEGOTIATION -> APPROVED
//         PENDING/NEGOTIATION -> CANCELLED
// APPROVED/CANCELLED 为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuotationStatus {
    Pending,     // 待议价
    Negotiation, // 议价中
    Approved,    // 已核价
    Cancelled,   // 已作废
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl QuotationStatus {
    /// 从字符串解析状态
    pub fn from_db_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "NEGOTIATION" => QuotationStatus::Negotiation,
            "APPROVED" => QuotationStatus::Approved,
            "CANCELLED" => QuotationStatus::Cancelled,
            _ => QuotationStatus::Pending, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            QuotationStatus::Pending => "PENDING",
            QuotationStatus::Negotiation => "NEGOTIATION",
            QuotationStatus::Approved => "APPROVED",
            QuotationStatus::Cancelled => "CANCELLED",
        }
    }

    /// 是否为终态（终态报价单不再接受任何状态变更）
    pub fn is_terminal(&self) -> bool {
        matches!(self, QuotationStatus::Approved | QuotationStatus::Cancelled)
    }
}

// ==========================================
// 供应商状态 (Supplier Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierStatus {
    Active,   // 合作中
    Inactive, // 停用
}

impl fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl SupplierStatus {
    pub fn from_db_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "INACTIVE" => SupplierStatus::Inactive,
            _ => SupplierStatus::Active,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            SupplierStatus::Active => "ACTIVE",
            SupplierStatus::Inactive => "INACTIVE",
        }
    }
}

// ==========================================
// 需求量状态 (Demand Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandStatus {
    Active,   // 生效
    Inactive, // 失效
}

impl DemandStatus {
    pub fn from_db_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "INACTIVE" => DemandStatus::Inactive,
            _ => DemandStatus::Active,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            DemandStatus::Active => "ACTIVE",
            DemandStatus::Inactive => "INACTIVE",
        }
    }
}

// ==========================================
// 需求量来源 (Demand Source)
// ==========================================
// 比价矩阵中每个商品的用量来源，用于可解释性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandSource {
    KitchenDemand, // 食堂期次报量
    BaseQuantity,  // 商品基准用量
}

impl fmt::Display for DemandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandSource::KitchenDemand => write!(f, "KITCHEN_DEMAND"),
            DemandSource::BaseQuantity => write!(f, "BASE_QUANTITY"),
        }
    }
}

// ==========================================
// 价格趋势 (Price Trend)
// ==========================================
// 相对上一核价期次的涨跌判定，±0.5% 以内视为持平
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceTrend {
    Up,     // 上涨
    Down,   // 下跌
    Stable, // 持平
}

impl PriceTrend {
    /// 由涨跌幅（百分比）判定趋势
    ///
    /// 边界: 恰好 ±0.5 判定为持平
    pub fn from_variance_percentage(pct: f64) -> Self {
        if pct > 0.5 {
            PriceTrend::Up
        } else if pct < -0.5 {
            PriceTrend::Down
        } else {
            PriceTrend::Stable
        }
    }
}

impl fmt::Display for PriceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceTrend::Up => write!(f, "UP"),
            PriceTrend::Down => write!(f, "DOWN"),
            PriceTrend::Stable => write!(f, "STABLE"),
        }
    }
}

// ==========================================
// 价格类型 (Price Type)
// ==========================================
// price_history 只记录核价通过的最终价格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceType {
    Approved, // 核价价格
}

impl PriceType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PriceType::Approved => "APPROVED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotation_status_roundtrip() {
        for s in [
            QuotationStatus::Pending,
            QuotationStatus::Negotiation,
            QuotationStatus::Approved,
            QuotationStatus::Cancelled,
        ] {
            assert_eq!(QuotationStatus::from_db_str(s.to_db_str()), s);
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(QuotationStatus::Approved.is_terminal());
        assert!(QuotationStatus::Cancelled.is_terminal());
        assert!(!QuotationStatus::Pending.is_terminal());
        assert!(!QuotationStatus::Negotiation.is_terminal());
    }

    #[test]
    fn test_price_trend_边界() {
        assert_eq!(PriceTrend::from_variance_percentage(0.5), PriceTrend::Stable);
        assert_eq!(PriceTrend::from_variance_percentage(-0.5), PriceTrend::Stable);
        assert_eq!(PriceTrend::from_variance_percentage(0.51), PriceTrend::Up);
        assert_eq!(PriceTrend::from_variance_percentage(-0.51), PriceTrend::Down);
        assert_eq!(PriceTrend::from_variance_percentage(0.0), PriceTrend::Stable);
    }
}
