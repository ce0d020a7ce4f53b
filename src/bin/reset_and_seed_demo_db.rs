// ==========================================
// 食堂集中采购比价系统 - 演示库重置与造数工具
// ==========================================
// 用法:
//   reset_and_seed_demo_db [db_path]
// 行为:
//   1. 备份并清空目标库
//   2. 建表并写入演示数据（上一期已核价 + 本期待议价）
//   3. 构建一次比价矩阵并打印摘要，确认链路可用
// ==========================================

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Local;
use rusqlite::{params, Connection};
use uuid::Uuid;

use canteen_procurement::api::ComparisonApi;
use canteen_procurement::db::{default_db_path, init_schema, open_sqlite_connection};
use canteen_procurement::logging;
use canteen_procurement::repository::{
    KitchenDemandRepository, ProductRepository, QuotationRepository,
};

const CURRENT_PERIOD: &str = "2024-02";
const PREVIOUS_PERIOD: &str = "2024-01";
const REGION: &str = "东区";

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(default_db_path);

    backup_and_reset_db(&db_path)?;

    if let Some(parent) = Path::new(&db_path).parent() {
        fs::create_dir_all(parent)?;
    }

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    seed_demo_scenario(&conn)?;

    print_matrix_summary(conn)?;

    eprintln!("演示库就绪: {}", db_path);
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("已备份 {} -> {}", db_path, backup_path);
    Ok(())
}

fn now_text() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn seed_demo_scenario(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let now = now_text();

    // 商品: (id, 编码, 名称, 单位, 品类, 基准用量, 基准价)
    let products = [
        ("P001", "SP-001", "大白菜", "kg", "蔬菜", 120.0, 2.6),
        ("P002", "SP-002", "土豆", "kg", "蔬菜", 200.0, 3.2),
        ("P003", "SP-003", "猪五花", "kg", "肉类", 80.0, 32.0),
        ("P004", "SP-004", "鸡胸肉", "kg", "肉类", 60.0, 18.0),
        ("P005", "SP-005", "大豆油", "桶", "粮油", 30.0, 95.0),
    ];
    for (id, code, name, unit, category, base_quantity, base_price) in products {
        conn.execute(
            r#"INSERT INTO product (
                product_id, product_code, product_name, unit, category,
                base_quantity, base_price, active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)"#,
            params![id, code, name, unit, category, base_quantity, base_price, now, now],
        )?;
    }

    // 供应商
    let suppliers = [
        ("S001", "GYS-001", "绿源农产"),
        ("S002", "GYS-002", "福泰食品"),
        ("S003", "GYS-003", "鑫隆粮油"),
    ];
    for (id, code, name) in suppliers {
        conn.execute(
            r#"INSERT INTO supplier (
                supplier_id, supplier_code, supplier_name, status, created_at, updated_at
            ) VALUES (?, ?, ?, 'ACTIVE', ?, ?)"#,
            params![id, code, name, now, now],
        )?;
    }

    // 食堂报量: 本期 P001 报量覆盖基准用量
    conn.execute(
        r#"INSERT INTO kitchen_period_demand (
            demand_id, product_id, period, quantity, status, created_at, updated_at
        ) VALUES (?, 'P001', ?, 150.0, 'ACTIVE', ?, ?)"#,
        params![Uuid::new_v4().to_string(), CURRENT_PERIOD, now, now],
    )?;

    // 上一期: 全部供应商已核价（为本期差异计算提供参照）
    for (supplier_id, markup) in [("S001", 0.0), ("S002", 0.05), ("S003", 0.02)] {
        let quotation_id = format!("Q-{}-{}", PREVIOUS_PERIOD, supplier_id);
        conn.execute(
            r#"INSERT INTO quotation (
                quotation_id, period, region, supplier_id, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, 'APPROVED', ?, ?)"#,
            params![quotation_id, PREVIOUS_PERIOD, REGION, supplier_id, now, now],
        )?;

        for (product_id, _, _, _, _, _, base_price) in products {
            let approved = base_price * (1.0 + markup);
            conn.execute(
                r#"INSERT INTO quote_item (
                    item_id, quotation_id, product_id, quantity, initial_price,
                    negotiated_price, approved_price, vat_percentage, currency,
                    created_at, updated_at
                ) VALUES (?, ?, ?, 50.0, ?, NULL, ?, 9.0, 'CNY', ?, ?)"#,
                params![
                    Uuid::new_v4().to_string(),
                    quotation_id,
                    product_id,
                    approved,
                    approved,
                    now,
                    now
                ],
            )?;
            conn.execute(
                r#"INSERT INTO price_history (
                    history_id, product_id, supplier_id, period, region,
                    price, price_type, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, 'APPROVED', ?)"#,
                params![
                    Uuid::new_v4().to_string(),
                    product_id,
                    supplier_id,
                    PREVIOUS_PERIOD,
                    REGION,
                    approved,
                    now
                ],
            )?;
        }
    }

    // 本期: 三家供应商初报待议价，价格围绕基准价浮动
    for (supplier_id, markup) in [("S001", 0.08), ("S002", -0.03), ("S003", 0.04)] {
        let quotation_id = format!("Q-{}-{}", CURRENT_PERIOD, supplier_id);
        conn.execute(
            r#"INSERT INTO quotation (
                quotation_id, period, region, supplier_id, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, 'PENDING', ?, ?)"#,
            params![quotation_id, CURRENT_PERIOD, REGION, supplier_id, now, now],
        )?;

        for (product_id, _, _, _, _, _, base_price) in products {
            let initial = base_price * (1.0 + markup);
            conn.execute(
                r#"INSERT INTO quote_item (
                    item_id, quotation_id, product_id, quantity, initial_price,
                    negotiated_price, approved_price, vat_percentage, currency,
                    created_at, updated_at
                ) VALUES (?, ?, ?, 50.0, ?, NULL, NULL, 9.0, 'CNY', ?, ?)"#,
                params![
                    Uuid::new_v4().to_string(),
                    quotation_id,
                    product_id,
                    initial,
                    now,
                    now
                ],
            )?;
        }
    }

    Ok(())
}

/// 构建一次比价矩阵并打印 JSON 摘要，确认取数/合并链路可用
fn print_matrix_summary(conn: Connection) -> Result<(), Box<dyn Error>> {
    let conn = Arc::new(Mutex::new(conn));
    let api = ComparisonApi::new(
        Arc::new(ProductRepository::new(conn.clone())),
        Arc::new(QuotationRepository::new(conn.clone())),
        Arc::new(KitchenDemandRepository::new(conn)),
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let matrix = runtime.block_on(api.build_comparison_matrix(CURRENT_PERIOD, REGION, &[]))?;

    let summary = serde_json::json!({
        "period": matrix.period,
        "region": matrix.region,
        "products": matrix.products.len(),
        "suppliers": matrix.suppliers.len(),
        "best_prices": matrix
            .products
            .iter()
            .filter(|p| p.best_price.is_some())
            .count(),
        "with_previous_reference": matrix
            .products
            .iter()
            .filter(|p| p.previous_approved_price.is_some())
            .count(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
