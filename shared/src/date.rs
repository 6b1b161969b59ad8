//! 时间字段处理
//!
//! API 的 `created_at` 字段多数情况下是 RFC 3339 字符串，但个别接口
//! 会返回 `YYYY-MM-DD HH:MM:SS` 形式。这里提供宽松的反序列化和统一的
//! 展示格式，解析失败按缺失处理而不是让整个响应反序列化失败。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// 宽松解析时间字符串
pub fn parse_lenient(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

/// serde 辅助：`Option<String>` -> `Option<DateTime<Utc>>`，容忍缺失和坏值
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_lenient))
}

/// 展示格式，如 "Jan 12, 2026 08:30"
pub fn format_display(dt: &DateTime<Utc>) -> String {
    dt.format("%b %d, %Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        let dt = parse_lenient("2026-01-12T08:30:00Z").unwrap();
        assert_eq!(format_display(&dt), "Jan 12, 2026 08:30");
    }

    #[test]
    fn parses_naive_database_format() {
        let dt = parse_lenient("2026-01-12 08:30:00").unwrap();
        assert_eq!(format_display(&dt), "Jan 12, 2026 08:30");
    }

    #[test]
    fn bad_value_becomes_none() {
        assert!(parse_lenient("yesterday").is_none());
    }
}
