//! 日期范围过滤 - 业务能力层

use chrono::NaiveDate;

use crate::error::InvalidRangeError;
use crate::models::PuzzleDescriptor;

/// 校验日期范围，`start > end` 时失败
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), InvalidRangeError> {
    if start > end {
        return Err(InvalidRangeError { start, end });
    }
    Ok(())
}

/// 保留日期落在 `[start, end]`（闭区间）内的题目，保持原顺序
pub fn filter(
    catalog: &[PuzzleDescriptor],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PuzzleDescriptor>, InvalidRangeError> {
    validate_range(start, end)?;
    Ok(catalog
        .iter()
        .filter(|d| start <= d.date && d.date <= end)
        .cloned()
        .collect())
}

/// 归档中最早和最晚的日期
pub fn date_span(catalog: &[PuzzleDescriptor]) -> Option<(NaiveDate, NaiveDate)> {
    let earliest = catalog.iter().map(|d| d.date).min()?;
    let latest = catalog.iter().map(|d| d.date).max()?;
    Some((earliest, latest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn ymd(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn catalog() -> Vec<PuzzleDescriptor> {
        // 归档页按日期倒序排列
        vec![
            PuzzleDescriptor::new(ymd(11, 3), Difficulty::Hard, "105"),
            PuzzleDescriptor::new(ymd(11, 2), Difficulty::Easy, "104"),
            PuzzleDescriptor::new(ymd(11, 1), Difficulty::Medium, "103"),
            PuzzleDescriptor::new(ymd(10, 31), Difficulty::Hard, "102"),
            PuzzleDescriptor::new(ymd(10, 30), Difficulty::Easy, "101"),
        ]
    }

    fn ids(items: &[PuzzleDescriptor]) -> Vec<&str> {
        items.iter().map(|d| d.identifier.as_str()).collect()
    }

    #[test]
    fn test_range_is_inclusive_and_keeps_order() {
        let result = filter(&catalog(), ymd(10, 31), ymd(11, 2)).unwrap();
        assert_eq!(ids(&result), vec!["104", "103", "102"]);
    }

    #[test]
    fn test_every_in_range_descriptor_is_kept() {
        let all = catalog();
        let (start, end) = (ymd(10, 30), ymd(11, 1));
        let result = filter(&all, start, end).unwrap();
        assert!(result.iter().all(|d| start <= d.date && d.date <= end));
        let expected = all
            .iter()
            .filter(|d| start <= d.date && d.date <= end)
            .count();
        assert_eq!(result.len(), expected);
    }

    #[test]
    fn test_single_day_range() {
        let result = filter(&catalog(), ymd(11, 1), ymd(11, 1)).unwrap();
        assert_eq!(ids(&result), vec!["103"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let result = filter(&catalog(), ymd(1, 1), ymd(1, 31)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_reversed_range_fails() {
        let err = filter(&catalog(), ymd(11, 2), ymd(11, 1)).unwrap_err();
        assert_eq!(
            err,
            InvalidRangeError {
                start: ymd(11, 2),
                end: ymd(11, 1)
            }
        );
        // 空目录同样报错
        assert!(filter(&[], ymd(11, 2), ymd(11, 1)).is_err());
    }

    #[test]
    fn test_date_span() {
        assert_eq!(date_span(&catalog()), Some((ymd(10, 30), ymd(11, 3))));
        assert_eq!(date_span(&[]), None);
    }
}
