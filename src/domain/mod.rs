// ==========================================
// 食堂集中采购比价系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务不变式
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod demand;
pub mod matrix;
pub mod price_history;
pub mod product;
pub mod quotation;
pub mod supplier;
pub mod types;

// 重导出核心类型
pub use demand::KitchenPeriodDemand;
pub use matrix::{
    CategoryOverview, ComparisonMatrix, GroupedOverview, MatrixProduct, RegionOverview,
    SupplierPerformance, SupplierQuote, SupplierSummary, VarianceStat,
};
pub use price_history::PriceHistoryRecord;
pub use product::Product;
pub use quotation::{Quotation, QuoteItem};
pub use supplier::Supplier;
pub use types::{
    DemandSource, DemandStatus, PriceTrend, PriceType, QuotationStatus, SupplierStatus,
};
