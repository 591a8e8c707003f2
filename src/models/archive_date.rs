//! 归档日期解析
//!
//! 下拉框中的日期形如 "31st October 2025"，偶尔带星期前缀。

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

const FORMATS: &[&str] = &["%d %B %Y", "%d %b %Y", "%B %d %Y", "%b %d %Y", "%Y-%m-%d"];

/// 序数后缀 "31st" → "31"
static ORDINAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("ordinal suffix pattern should compile")
});

/// 开头的星期 "Friday " / "Sat, "
static WEEKDAY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(mon|tue|wed|thu|fri|sat|sun)[a-z]*,?\s+")
        .expect("weekday prefix pattern should compile")
});

/// 解析归档日期，无法识别时返回 None
pub fn parse_archive_date(text: &str) -> Option<NaiveDate> {
    let cleaned = ORDINAL_SUFFIX.replace_all(text.trim(), "$1");
    let cleaned = WEEKDAY_PREFIX.replace(&cleaned, "");
    let normalized = cleaned
        .replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&normalized, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_static_patterns_compile() {
        assert!(ORDINAL_SUFFIX.is_match("31st"));
        assert!(WEEKDAY_PREFIX.is_match("Sat, 1 November 2025"));
    }

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(parse_archive_date("31st October 2025"), Some(ymd(2025, 10, 31)));
        assert_eq!(parse_archive_date("2nd November 2025"), Some(ymd(2025, 11, 2)));
        assert_eq!(parse_archive_date("3rd March 2024"), Some(ymd(2024, 3, 3)));
        assert_eq!(parse_archive_date("11th May 2024"), Some(ymd(2024, 5, 11)));
    }

    #[test]
    fn test_weekday_prefix_and_short_month() {
        assert_eq!(parse_archive_date("Friday 31st Oct 2025"), Some(ymd(2025, 10, 31)));
        assert_eq!(parse_archive_date("Sat, 1st November 2025"), Some(ymd(2025, 11, 1)));
    }

    #[test]
    fn test_month_first_and_iso() {
        assert_eq!(parse_archive_date("October 31st, 2025"), Some(ymd(2025, 10, 31)));
        assert_eq!(parse_archive_date("2025-10-31"), Some(ymd(2025, 10, 31)));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_archive_date("Samurai Sudoku Archive"), None);
        assert_eq!(parse_archive_date(""), None);
        assert_eq!(parse_archive_date("31st Octember 2025"), None);
    }
}
