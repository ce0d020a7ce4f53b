// ==========================================
// 食堂集中采购比价系统 - 数据库工具模块
// ==========================================
// 职责: 提供动态 SQL 片段与时间字段转换的公共函数
// ==========================================

use chrono::{Local, NaiveDateTime};

/// 数据库时间字段的统一格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 构建 IN 子句的 SQL 片段
///
/// # 示例
/// ```
/// use canteen_procurement::repository::sql_utils::build_in_clause;
///
/// let ids = vec!["Q1".to_string(), "Q2".to_string()];
/// assert_eq!(build_in_clause("quotation_id", &ids), "quotation_id IN (?, ?)");
///
/// // 空列表返回永假条件，确保 SQL 语法正确
/// let empty: Vec<String> = vec![];
/// assert_eq!(build_in_clause("quotation_id", &empty), "1 = 0");
/// ```
pub fn build_in_clause<T: AsRef<str>>(column_name: &str, values: &[T]) -> String {
    if values.is_empty() {
        return "1 = 0".to_string();
    }

    let placeholders = values.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    format!("{} IN ({})", column_name, placeholders)
}

/// 当前本地时间，数据库存储格式
pub fn now_text() -> String {
    Local::now().naive_local().format(DATETIME_FORMAT).to_string()
}

/// 解析数据库时间字段
///
/// # 参数
/// - `value`: 数据库取出的文本
/// - `column_index`: 所在列序号（用于错误定位）
pub fn parse_datetime(value: &str, column_index: usize) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            column_index,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_in_clause() {
        let ids = vec!["A", "B", "C"];
        assert_eq!(build_in_clause("id", &ids), "id IN (?, ?, ?)");
    }

    #[test]
    fn test_build_in_clause_空列表() {
        let empty: Vec<String> = vec![];
        assert_eq!(build_in_clause("id", &empty), "1 = 0");
    }

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2024-01-15 08:30:00", 0).unwrap();
        assert_eq!(dt.format(DATETIME_FORMAT).to_string(), "2024-01-15 08:30:00");
    }

    #[test]
    fn test_parse_datetime_格式错误() {
        assert!(parse_datetime("2024/01/15", 0).is_err());
    }
}
