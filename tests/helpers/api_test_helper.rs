// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用测试环境
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tempfile::NamedTempFile;

use canteen_procurement::api::{ComparisonApi, QuotationApi, StaticAccessControl};
use canteen_procurement::repository::{
    KitchenDemandRepository, PriceHistoryRepository, ProductRepository, QuotationRepository,
    SupplierRepository,
};

/// 具备采购管理角色的调用者
pub const MANAGER_ID: &str = "mgr001";
/// 具备核价角色的调用者
pub const APPROVER_ID: &str = "boss001";
/// 无任何角色的调用者
pub const OUTSIDER_ID: &str = "guest001";

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含所有API实例和必要的依赖
pub struct ApiTestEnv {
    pub db_path: String,
    pub comparison_api: ComparisonApi,
    pub quotation_api: QuotationApi,

    // Repository层（用于测试数据准备与断言）
    pub product_repo: Arc<ProductRepository>,
    pub quotation_repo: Arc<QuotationRepository>,
    pub demand_repo: Arc<KitchenDemandRepository>,
    pub supplier_repo: Arc<SupplierRepository>,
    pub price_history_repo: Arc<PriceHistoryRepository>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境
    ///
    /// # 说明
    /// - 使用临时数据库文件，自动建表
    /// - 授权采用静态角色表: MANAGER_ID 议价、APPROVER_ID 核价
    pub fn new() -> Result<Self, String> {
        let (temp_file, db_path) = test_helpers::create_test_db()
            .map_err(|e| format!("创建测试数据库失败: {}", e))?;

        let conn = test_helpers::open_test_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let product_repo = Arc::new(ProductRepository::new(conn.clone()));
        let quotation_repo = Arc::new(QuotationRepository::new(conn.clone()));
        let demand_repo = Arc::new(KitchenDemandRepository::new(conn.clone()));
        let supplier_repo = Arc::new(SupplierRepository::new(conn.clone()));
        let price_history_repo = Arc::new(PriceHistoryRepository::new(conn.clone()));

        let access = Arc::new(StaticAccessControl::new(
            vec![MANAGER_ID.to_string()],
            vec![APPROVER_ID.to_string()],
        ));

        let comparison_api = ComparisonApi::new(
            product_repo.clone(),
            quotation_repo.clone(),
            demand_repo.clone(),
        );
        let quotation_api = QuotationApi::new(quotation_repo.clone(), access);

        Ok(Self {
            db_path,
            comparison_api,
            quotation_api,
            product_repo,
            quotation_repo,
            demand_repo,
            supplier_repo,
            price_history_repo,
            _temp_file: temp_file,
        })
    }

    /// 打开一条独立连接用于造数/断言
    pub fn open_conn(&self) -> Connection {
        test_helpers::open_test_connection(&self.db_path).expect("无法打开测试数据库连接")
    }
}
