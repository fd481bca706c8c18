//! # Calendar Helpers
//!
//! Every record stores its date as a fixed-width `YYYY-MM-DD` string.
//! Because the format is zero-padded, plain string comparison orders dates
//! correctly and the month always sits at characters 6–7.
//!
//! ```text
//!   2025-03-14
//!   ││││ ││ ││
//!   year  │  day
//!       month (chars 6–7, 1-indexed)
//! ```
//!
//! Nothing here reads the clock: callers pass "today" in.

use chrono::{Datelike, NaiveDate};

/// Abbreviated month names in calendar order.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Storage date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Month labels as owned strings, ready for a response body.
pub fn month_labels() -> Vec<String> {
    MONTH_LABELS.iter().map(|m| m.to_string()).collect()
}

/// Parses a record date.
///
/// Returns `None` unless the string is exactly ten characters and a real
/// calendar date. "2025-02-30" is well-formed but not a date, so it is
/// `None` and falls out of every monthly series.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    if date.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Extracts `(year, month)` from a record date. Month is 1-based.
///
/// ## Example
/// ```rust
/// use downtown_core::calendar::year_month;
///
/// assert_eq!(year_month("2025-03-14"), Some((2025, 3)));
/// assert_eq!(year_month("14/03/2025"), None);
/// ```
pub fn year_month(date: &str) -> Option<(i32, u32)> {
    parse_date(date).map(|d| (d.year(), d.month()))
}

/// Formats a date the way records store it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// First and last day of a month, as record date strings.
///
/// Returns `None` for an invalid month.
pub fn month_window(year: i32, month: u32) -> Option<(String, String)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    Some((format_date(first), format_date(last)))
}

/// Window covering the month that contains `today`.
pub fn current_month_window(today: NaiveDate) -> (String, String) {
    month_window(today.year(), today.month()).unwrap_or_else(|| {
        // Only reachable at the very end of chrono's supported range.
        let first = today.with_day(1).unwrap_or(today);
        (format_date(first), format_date(today))
    })
}

/// Inclusive string-range test on a record date.
#[inline]
pub fn in_window(date: &str, start: &str, end: &str) -> bool {
    date >= start && date <= end
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_labels_complete() {
        let labels = month_labels();
        assert_eq!(labels.len(), 12);
        assert_eq!(labels[0], "Jan");
        assert_eq!(labels[11], "Dec");
    }

    #[test]
    fn test_year_month_rejects_malformed() {
        assert_eq!(year_month("2025-3-14"), None);
        assert_eq!(year_month("2025-13-01"), None);
        assert_eq!(year_month(""), None);
        assert_eq!(year_month("2025-02-30"), None);
        assert_eq!(year_month("2025-12-31"), Some((2025, 12)));
    }

    #[test]
    fn test_month_window_february_leap_year() {
        let (start, end) = month_window(2024, 2).unwrap();
        assert_eq!(start, "2024-02-01");
        assert_eq!(end, "2024-02-29");
    }

    #[test]
    fn test_month_window_december() {
        let (start, end) = month_window(2025, 12).unwrap();
        assert_eq!(start, "2025-12-01");
        assert_eq!(end, "2025-12-31");
    }

    #[test]
    fn test_month_window_invalid_month() {
        assert!(month_window(2025, 13).is_none());
    }

    #[test]
    fn test_current_month_window() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 17).unwrap();
        let (start, end) = current_month_window(today);
        assert_eq!(start, "2025-04-01");
        assert_eq!(end, "2025-04-30");
    }

    #[test]
    fn test_in_window_inclusive() {
        assert!(in_window("2025-04-01", "2025-04-01", "2025-04-30"));
        assert!(in_window("2025-04-30", "2025-04-01", "2025-04-30"));
        assert!(!in_window("2025-05-01", "2025-04-01", "2025-04-30"));
        assert!(!in_window("2025-03-31", "2025-04-01", "2025-04-30"));
    }
}
