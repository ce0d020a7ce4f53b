// ==========================================
// 食堂集中采购比价系统 - 比价矩阵 API
// ==========================================
// 职责: 比价矩阵查询、筛选项查询
// 并发: 取数阶段各独立查询经 spawn_blocking 并发执行，
//       全部就绪后进入单线程合并阶段（builder 非并发安全）
// ==========================================

use std::sync::Arc;

use tokio::task;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_categories, validate_period, validate_region};
use crate::domain::matrix::ComparisonMatrix;
use crate::engine::aggregator::GroupedAggregator;
use crate::engine::best_price::BestPriceSelector;
use crate::engine::demand_resolver::DemandResolver;
use crate::engine::matrix_builder::MatrixBuilder;
use crate::engine::variance::VarianceCalculator;
use crate::repository::demand_repo::KitchenDemandRepository;
use crate::repository::product_repo::ProductRepository;
use crate::repository::quotation_repo::{PreviousApprovedRecord, QuotationRepository};

// ==========================================
// ComparisonApi - 比价矩阵 API
// ==========================================

/// 比价矩阵API
///
/// 职责：
/// 1. 构建商品×供应商比价矩阵（含最低价/历史差异/分组总览）
/// 2. 期次/区域/品类筛选项查询（作废报价单一律排除）
pub struct ComparisonApi {
    product_repo: Arc<ProductRepository>,
    quotation_repo: Arc<QuotationRepository>,
    demand_repo: Arc<KitchenDemandRepository>,
}

impl ComparisonApi {
    /// 创建新的ComparisonApi实例
    pub fn new(
        product_repo: Arc<ProductRepository>,
        quotation_repo: Arc<QuotationRepository>,
        demand_repo: Arc<KitchenDemandRepository>,
    ) -> Self {
        Self {
            product_repo,
            quotation_repo,
            demand_repo,
        }
    }

    // ==========================================
    // 比价矩阵构建
    // ==========================================

    /// 构建比价矩阵
    ///
    /// # 参数
    /// - `period`: 期次 (YYYY-MM)
    /// - `region`: 区域
    /// - `categories`: 品类集合；空集合表示全部品类
    ///
    /// # 返回
    /// - `Ok(ComparisonMatrix)`: 矩阵（无匹配商品时为空矩阵，不是错误）
    /// - `Err(ApiError)`: 参数非法或取数失败
    pub async fn build_comparison_matrix(
        &self,
        period: &str,
        region: &str,
        categories: &[String],
    ) -> ApiResult<ComparisonMatrix> {
        validate_period(period)?;
        validate_region(region)?;
        validate_categories(categories)?;

        let period = period.to_string();
        let region = region.to_string();
        let categories = categories.to_vec();

        debug!(period = %period, region = %region, "开始构建比价矩阵");

        // ===== 取数阶段: 各独立查询并发执行 =====
        let products_task = {
            let repo = self.product_repo.clone();
            let categories = categories.clone();
            task::spawn_blocking(move || repo.list_active(&categories))
        };
        let suppliers_task = {
            let repo = self.quotation_repo.clone();
            let period = period.clone();
            let region = region.clone();
            task::spawn_blocking(move || repo.matrix_suppliers(&period, &region))
        };
        let demands_task = {
            let repo = self.demand_repo.clone();
            let period = period.clone();
            task::spawn_blocking(move || repo.list_active_by_period(&period))
        };
        let rows_task = {
            let repo = self.quotation_repo.clone();
            let period = period.clone();
            let region = region.clone();
            let categories = categories.clone();
            task::spawn_blocking(move || repo.quote_rows(&period, &region, &categories))
        };
        let previous_task = {
            let repo = self.quotation_repo.clone();
            let period = period.clone();
            let region = region.clone();
            let categories = categories.clone();
            // 上一期次定位与明细读取相互依赖，归入同一任务
            task::spawn_blocking(move || {
                let previous_period = repo.previous_approved_period(&period, &region)?;
                let rows: Vec<PreviousApprovedRecord> = match &previous_period {
                    Some(p) => repo.previous_approved_rows(p, &region, &categories)?,
                    None => Vec::new(),
                };
                Ok::<_, crate::repository::error::RepositoryError>((previous_period, rows))
            })
        };

        let (products, suppliers, demands, rows, previous) = tokio::try_join!(
            products_task,
            suppliers_task,
            demands_task,
            rows_task,
            previous_task
        )
        .map_err(|e| ApiError::InternalError(format!("并发取数任务失败: {}", e)))?;

        let products = products?;
        let suppliers = suppliers?;
        let demands = demands?;
        let rows = rows?;
        let (previous_period, previous_rows) = previous?;

        // ===== 合并阶段: 单线程构建 =====
        let resolved = DemandResolver::new().resolve(&products, &demands);

        let mut builder =
            MatrixBuilder::new(&period, &region, &categories, products, suppliers, &resolved);
        builder.apply_quote_rows(&rows);

        BestPriceSelector::new().select(&mut builder);

        let variance = VarianceCalculator::new();
        let reference = variance.build_reference(previous_period, &previous_rows);
        variance.apply(&mut builder, &reference);

        let overview = GroupedAggregator::new().aggregate(&builder);
        let matrix = builder.finish(overview);

        info!(
            period = %period,
            region = %region,
            products = matrix.products.len(),
            suppliers = matrix.suppliers.len(),
            "比价矩阵构建完成"
        );

        Ok(matrix)
    }

    // ==========================================
    // 筛选项查询
    // ==========================================

    /// 全部期次（排除作废报价单）
    pub fn list_periods(&self) -> ApiResult<Vec<String>> {
        Ok(self.quotation_repo.list_periods()?)
    }

    /// 期次内的区域（排除作废报价单）
    pub fn list_regions(&self, period: &str) -> ApiResult<Vec<String>> {
        validate_period(period)?;
        Ok(self.quotation_repo.list_regions(period)?)
    }

    /// 在采商品的全部品类
    pub fn list_all_categories(&self) -> ApiResult<Vec<String>> {
        Ok(self.product_repo.list_categories()?)
    }

    /// (期次, 区域) 内可比价的品类（排除作废报价单）
    pub fn list_categories(&self, period: &str, region: &str) -> ApiResult<Vec<String>> {
        validate_period(period)?;
        validate_region(region)?;
        Ok(self.quotation_repo.list_categories(period, region)?)
    }
}
