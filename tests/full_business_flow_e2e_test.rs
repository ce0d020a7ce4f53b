// ==========================================
// 完整业务流程端到端测试
// ==========================================
// 场景: 初报 → 比价 → 议价 → 核价 → 历史留痕 → 下期差异参照
// ==========================================

mod helpers;

use std::collections::HashMap;

use canteen_procurement::domain::types::PriceTrend;
use canteen_procurement::logging;
use helpers::api_test_helper::*;

#[tokio::test]
async fn test_初报议价核价全流程() {
    logging::init_test();

    println!("\n=== 测试：初报 → 比价 → 议价 → 核价 全流程 ===");

    // 步骤 1: 准备主数据与本期初报
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let conn = env.open_conn();
    // 商品X: 基准价100, 基准用量10
    test_helpers::insert_product(&conn, "PX", "蔬菜", 10.0, 100.0).unwrap();
    test_helpers::insert_supplier(&conn, "SA", "GYS-001").unwrap();
    test_helpers::insert_supplier(&conn, "SB", "GYS-002").unwrap();
    test_helpers::insert_quotation(&conn, "QA", "2024-02", "东区", "SA", "PENDING").unwrap();
    test_helpers::insert_quotation(&conn, "QB", "2024-02", "东区", "SB", "PENDING").unwrap();
    test_helpers::insert_quote_item(&conn, "QA", "PX", 90.0, None, None).unwrap();
    test_helpers::insert_quote_item(&conn, "QB", "PX", 95.0, None, None).unwrap();
    println!("✓ 步骤 1: 主数据与初报已就绪");

    // 步骤 2: 初报比价 —— A初报90最低
    let matrix = env
        .comparison_api
        .build_comparison_matrix("2024-02", "东区", &[])
        .await
        .expect("比价矩阵构建应该成功");
    assert_eq!(matrix.products[0].best_price, Some(90.0));
    assert_eq!(matrix.products[0].best_supplier_id.as_deref(), Some("SA"));
    println!("✓ 步骤 2: 初报最低价 90 @ SA");

    // 步骤 3: A转入议价并议到85
    env.quotation_api
        .negotiate_one(MANAGER_ID, "QA")
        .expect("转入议价应该成功");
    env.quotation_api
        .update_negotiated_price(MANAGER_ID, "QA", "PX", 85.0)
        .expect("议价价更新应该成功");

    let matrix = env
        .comparison_api
        .build_comparison_matrix("2024-02", "东区", &[])
        .await
        .unwrap();
    assert_eq!(matrix.products[0].best_price, Some(85.0));
    println!("✓ 步骤 3: 议价后最低价 85 @ SA");

    // 步骤 4: 核价A, 覆盖价80
    let mut overrides = HashMap::new();
    overrides.insert("PX".to_string(), 80.0);
    let response = env
        .quotation_api
        .approve_one(APPROVER_ID, "QA", Some(overrides))
        .expect("核价应该成功");
    assert_eq!(response.approved_items, 1);
    assert_eq!(response.history_rows_written, 1);

    assert_eq!(
        test_helpers::approved_price(&conn, "QA", "PX").unwrap(),
        Some(80.0)
    );
    // 恰好一条核价历史, 价格80, 类型APPROVED
    let history = env
        .price_history_repo
        .list_by_period_region("2024-02", "东区")
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].price, 80.0);
    println!("✓ 步骤 4: 核价通过, 历史留痕 80 @ SA");

    // 步骤 5: 下一期(2024-03)A报88, 差异参照上期核价80
    test_helpers::insert_quotation(&conn, "QA2", "2024-03", "东区", "SA", "PENDING").unwrap();
    test_helpers::insert_quote_item(&conn, "QA2", "PX", 88.0, None, None).unwrap();

    let matrix = env
        .comparison_api
        .build_comparison_matrix("2024-03", "东区", &[])
        .await
        .unwrap();
    let product = &matrix.products[0];
    assert_eq!(product.previous_approved_price, Some(80.0));
    assert_eq!(product.previous_approved_period.as_deref(), Some("2024-02"));

    let quote = &product.supplier_quotes["SA"];
    assert_eq!(quote.previous_price, Some(80.0));
    let variance = quote.variance_percentage.unwrap();
    assert!((variance - 10.0).abs() < 1e-9, "涨跌幅应为10.0: {}", variance);
    assert_eq!(quote.trend, Some(PriceTrend::Up));
    println!("✓ 步骤 5: 下期差异参照生效, 88 对 80 涨 10%");

    println!("=== 全流程测试通过 ===");
}

#[tokio::test]
async fn test_批量议价核价流程() {
    logging::init_test();

    println!("\n=== 测试：批量议价 → 批量核价 流程 ===");

    // 步骤 1: 三家供应商初报
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let conn = env.open_conn();
    test_helpers::insert_product(&conn, "PX", "蔬菜", 10.0, 100.0).unwrap();
    for (supplier_id, code, quotation_id, price) in [
        ("SA", "GYS-001", "QA", 90.0),
        ("SB", "GYS-002", "QB", 95.0),
        ("SC", "GYS-003", "QC", 93.0),
    ] {
        test_helpers::insert_supplier(&conn, supplier_id, code).unwrap();
        test_helpers::insert_quotation(&conn, quotation_id, "2024-02", "东区", supplier_id, "PENDING")
            .unwrap();
        test_helpers::insert_quote_item(&conn, quotation_id, "PX", price, None, None).unwrap();
    }
    println!("✓ 步骤 1: 三家供应商初报已就绪");

    // 步骤 2: 批量转入议价
    let ids: Vec<String> = ["QA", "QB", "QC"].iter().map(|s| s.to_string()).collect();
    let response = env
        .quotation_api
        .batch_negotiate(MANAGER_ID, &ids)
        .expect("批量议价应该成功");
    assert_eq!(response.updated_count, 3);
    println!("✓ 步骤 2: {} 张报价单转入议价", response.updated_count);

    // 步骤 3: 批量核价 —— 最终价 = 议价价 ?? 初报价
    env.quotation_api
        .update_negotiated_price(MANAGER_ID, "QA", "PX", 85.0)
        .unwrap();
    let response = env
        .quotation_api
        .approve_many(APPROVER_ID, &ids)
        .expect("批量核价应该成功");
    assert_eq!(response.approved_count, 3);
    assert_eq!(response.history_rows_written, 3);
    println!("✓ 步骤 3: {} 张报价单核价通过", response.approved_count);

    // 步骤 4: 核价结果可被下次比价读到
    let matrix = env
        .comparison_api
        .build_comparison_matrix("2024-02", "东区", &[])
        .await
        .unwrap();
    let product = &matrix.products[0];
    // A的核价85为全场最低
    assert_eq!(product.best_price, Some(85.0));
    assert_eq!(product.supplier_quotes["SA"].approved_price, Some(85.0));
    assert_eq!(product.supplier_quotes["SB"].approved_price, Some(95.0));
    println!("✓ 步骤 4: 核价结果进入比价矩阵");

    println!("=== 批量流程测试通过 ===");
}
