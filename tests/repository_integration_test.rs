// ==========================================
// Repository 层集成测试
// ==========================================
// 测试范围: 主数据读取、报量登记、比价取数查询、核价历史查询
// ==========================================

mod helpers;

use canteen_procurement::domain::demand::KitchenPeriodDemand;
use canteen_procurement::domain::types::DemandStatus;
use chrono::NaiveDate;
use helpers::api_test_helper::*;

// ==========================================
// 商品/供应商主数据
// ==========================================

#[test]
fn test_product_repo_在采过滤与品类过滤() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let conn = env.open_conn();

    test_helpers::insert_product(&conn, "P1", "蔬菜", 10.0, 5.0).unwrap();
    test_helpers::insert_product(&conn, "P2", "肉类", 4.0, 30.0).unwrap();
    test_helpers::insert_product(&conn, "P3", "蔬菜", 8.0, 6.0).unwrap();
    test_helpers::deactivate_product(&conn, "P3").unwrap();

    // 停采商品不出现
    let all = env.product_repo.list_active(&[]).unwrap();
    assert_eq!(all.len(), 2);

    let veg = env.product_repo.list_active(&["蔬菜".to_string()]).unwrap();
    assert_eq!(veg.len(), 1);
    assert_eq!(veg[0].product_id, "P1");

    // 品类清单只含在采商品
    let categories = env.product_repo.list_categories().unwrap();
    assert_eq!(categories, vec!["肉类".to_string(), "蔬菜".to_string()]);

    let found = env.product_repo.find_by_id("P2").unwrap();
    assert_eq!(found.unwrap().category, "肉类");
    assert!(env.product_repo.find_by_id("P404").unwrap().is_none());
}

#[test]
fn test_supplier_repo_合作状态过滤() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let conn = env.open_conn();

    test_helpers::insert_supplier(&conn, "S1", "GYS-002").unwrap();
    test_helpers::insert_supplier(&conn, "S2", "GYS-001").unwrap();
    test_helpers::insert_supplier(&conn, "S3", "GYS-003").unwrap();
    test_helpers::deactivate_supplier(&conn, "S3").unwrap();

    // 按编码升序, 停用供应商不出现
    let active = env.supplier_repo.list_active().unwrap();
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].supplier_id, "S2");
    assert_eq!(active[1].supplier_id, "S1");

    let s3 = env.supplier_repo.find_by_id("S3").unwrap().unwrap();
    assert!(!s3.is_active());
}

// ==========================================
// 食堂报量
// ==========================================

#[test]
fn test_demand_repo_登记与覆盖() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let conn = env.open_conn();
    test_helpers::insert_product(&conn, "P1", "蔬菜", 10.0, 5.0).unwrap();

    let ts = NaiveDate::from_ymd_opt(2024, 2, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let demand = KitchenPeriodDemand {
        demand_id: "D1".to_string(),
        product_id: "P1".to_string(),
        period: "2024-02".to_string(),
        quantity: 30.0,
        status: DemandStatus::Active,
        created_at: ts,
        updated_at: ts,
    };
    env.demand_repo.upsert(&demand).unwrap();

    // 同 (商品, 期次) 重复登记覆盖报量
    let demand = KitchenPeriodDemand {
        quantity: 45.0,
        ..demand
    };
    env.demand_repo.upsert(&demand).unwrap();

    let demands = env.demand_repo.list_active_by_period("2024-02").unwrap();
    assert_eq!(demands.len(), 1);
    assert_eq!(demands[0].quantity, 45.0);

    // 其他期次不可见
    assert!(env.demand_repo.list_active_by_period("2024-03").unwrap().is_empty());
}

// ==========================================
// 比价取数查询
// ==========================================

#[test]
fn test_quotation_repo_上一核价期次定位() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let conn = env.open_conn();

    test_helpers::insert_supplier(&conn, "S1", "GYS-001").unwrap();
    // 东区: 2023-11 已核价, 2023-12 待议价(不算), 2024-01 已核价
    test_helpers::insert_quotation(&conn, "Q1", "2023-11", "东区", "S1", "APPROVED").unwrap();
    test_helpers::insert_quotation(&conn, "Q2", "2023-12", "东区", "S1", "PENDING").unwrap();
    test_helpers::insert_quotation(&conn, "Q3", "2024-01", "东区", "S1", "APPROVED").unwrap();
    // 西区的已核价期次不跨区域生效
    test_helpers::insert_quotation(&conn, "Q4", "2024-01", "西区", "S1", "APPROVED").unwrap();

    // 严格小于当前期次的最大已核价期次
    let prev = env
        .quotation_repo
        .previous_approved_period("2024-02", "东区")
        .unwrap();
    assert_eq!(prev.as_deref(), Some("2024-01"));

    // 当前期次自身不参与
    let prev = env
        .quotation_repo
        .previous_approved_period("2024-01", "东区")
        .unwrap();
    assert_eq!(prev.as_deref(), Some("2023-11"));

    // 无更早已核价期次
    let prev = env
        .quotation_repo
        .previous_approved_period("2023-11", "东区")
        .unwrap();
    assert_eq!(prev, None);
}

#[test]
fn test_quotation_repo_比价供应商列按编码升序() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let conn = env.open_conn();

    test_helpers::insert_supplier(&conn, "S1", "GYS-002").unwrap();
    test_helpers::insert_supplier(&conn, "S2", "GYS-001").unwrap();
    test_helpers::insert_quotation(&conn, "Q1", "2024-02", "东区", "S1", "PENDING").unwrap();
    test_helpers::insert_quotation(&conn, "Q2", "2024-02", "东区", "S2", "NEGOTIATION").unwrap();

    let suppliers = env.quotation_repo.matrix_suppliers("2024-02", "东区").unwrap();
    assert_eq!(suppliers.len(), 2);
    // 编码升序决定列序与并列裁决顺序
    assert_eq!(suppliers[0].supplier_code, "GYS-001");
    assert_eq!(suppliers[1].supplier_code, "GYS-002");
}

#[test]
fn test_quotation_repo_上一期核价明细只取正核价() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let conn = env.open_conn();

    test_helpers::insert_product(&conn, "P1", "蔬菜", 10.0, 5.0).unwrap();
    test_helpers::insert_product(&conn, "P2", "蔬菜", 10.0, 8.0).unwrap();
    test_helpers::insert_supplier(&conn, "S1", "GYS-001").unwrap();
    test_helpers::insert_quotation(&conn, "Q1", "2024-01", "东区", "S1", "APPROVED").unwrap();
    test_helpers::insert_quote_item(&conn, "Q1", "P1", 5.0, None, Some(5.5)).unwrap();
    // 未定价明细不进入参照
    test_helpers::insert_quote_item(&conn, "Q1", "P2", 0.0, None, None).unwrap();

    let rows = env
        .quotation_repo
        .previous_approved_rows("2024-01", "东区", &[])
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product_id, "P1");
    assert_eq!(rows[0].price, 5.5);
}

// ==========================================
// 核价历史
// ==========================================

#[test]
fn test_price_history_repo_查询维度() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let conn = env.open_conn();

    test_helpers::insert_price_history(&conn, "P1", "S1", "2024-01", "东区", 5.5).unwrap();
    test_helpers::insert_price_history(&conn, "P1", "S1", "2024-02", "东区", 5.8).unwrap();
    test_helpers::insert_price_history(&conn, "P2", "S1", "2024-02", "东区", 30.0).unwrap();
    test_helpers::insert_price_history(&conn, "P1", "S1", "2024-02", "西区", 6.0).unwrap();

    let by_period = env
        .price_history_repo
        .list_by_period_region("2024-02", "东区")
        .unwrap();
    assert_eq!(by_period.len(), 2);

    // 商品轨迹按期次降序
    let trail = env.price_history_repo.list_by_product("P1").unwrap();
    assert_eq!(trail.len(), 3);
    assert_eq!(trail[0].period, "2024-02");
    assert_eq!(trail[trail.len() - 1].period, "2024-01");
}
