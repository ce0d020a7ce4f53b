// ==========================================
// 食堂集中采购比价系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 询价比价与议价审批引擎 (人工最终定价权)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    DemandSource, DemandStatus, PriceTrend, PriceType, QuotationStatus, SupplierStatus,
};

// 领域实体
pub use domain::{
    ComparisonMatrix, KitchenPeriodDemand, MatrixProduct, PriceHistoryRecord, Product, Quotation,
    QuoteItem, Supplier, SupplierQuote, SupplierSummary,
};

// 引擎
pub use engine::{
    BestPriceSelector, DemandResolver, GroupedAggregator, MatrixBuilder, QuotationLifecycle,
    VarianceCalculator,
};

// API
pub use api::{AccessControl, ComparisonApi, QuotationApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "食堂集中采购比价系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";
