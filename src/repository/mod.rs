// ==========================================
// 食堂集中采购比价系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod demand_repo;
pub mod error;
pub mod price_history_repo;
pub mod product_repo;
pub mod quotation_repo;
pub mod sql_utils;
pub mod supplier_repo;

// 重导出核心仓储
pub use demand_repo::KitchenDemandRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use price_history_repo::PriceHistoryRepository;
pub use product_repo::ProductRepository;
pub use quotation_repo::{
    ApproveOutcome, BatchApproveOutcome, BatchNegotiateOutcome, MatrixSupplierRecord,
    PreviousApprovedRecord, QuotationRepository, QuoteRowRecord,
};
pub use supplier_repo::SupplierRepository;
