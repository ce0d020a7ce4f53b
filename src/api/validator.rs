// ==========================================
// 食堂集中采购比价系统 - 输入校验
// ==========================================
// 职责: API 入参的形式校验
// 约束: 期次必须为 YYYY-MM，保证字典序即时间序
//       （"上一期次"查询依赖该性质）
// ==========================================

use crate::api::error::{ApiError, ApiResult};

/// 校验期次格式 (YYYY-MM)
pub fn validate_period(period: &str) -> ApiResult<()> {
    let bytes = period.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[..4].iter().all(|b| b.is_ascii_digit())
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(|b| b.is_ascii_digit());

    if !well_formed {
        return Err(ApiError::InvalidInput(format!(
            "期次格式错误，应为YYYY-MM: {}",
            period
        )));
    }

    let month: u32 = period[5..7].parse().unwrap_or(0);
    if !(1..=12).contains(&month) {
        return Err(ApiError::InvalidInput(format!(
            "期次月份非法，应为01-12: {}",
            period
        )));
    }

    Ok(())
}

/// 校验区域非空
pub fn validate_region(region: &str) -> ApiResult<()> {
    if region.trim().is_empty() {
        return Err(ApiError::InvalidInput("区域不能为空".to_string()));
    }
    Ok(())
}

/// 校验品类集合（空集合表示全部品类，允许）
pub fn validate_categories(categories: &[String]) -> ApiResult<()> {
    if categories.iter().any(|c| c.trim().is_empty()) {
        return Err(ApiError::InvalidInput("品类不能为空字符串".to_string()));
    }
    Ok(())
}
