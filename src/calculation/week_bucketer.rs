//! Week bucketing.
//!
//! This module assigns dates to Monday-first calendar weeks and enumerates
//! the weeks touched by a date range. Weeks are Monday-first regardless of
//! locale; a Sunday belongs to the week opened by the preceding Monday.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{WeekKey, WeekWindow};

/// Returns the Monday-to-Sunday window containing `date`.
///
/// # Example
///
/// ```
/// use invoice_engine::calculation::week_window_of;
/// use chrono::NaiveDate;
///
/// // 2026-01-18 is a Sunday
/// let window = week_window_of(NaiveDate::from_ymd_opt(2026, 1, 18).unwrap());
/// assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
/// assert_eq!(window.end_date, NaiveDate::from_ymd_opt(2026, 1, 18).unwrap());
/// ```
pub fn week_window_of(date: NaiveDate) -> WeekWindow {
    let days_from_monday = i64::from(date.weekday().num_days_from_monday());
    WeekWindow::starting(date - Duration::days(days_from_monday))
}

/// Returns the stable identifier of a week window.
///
/// ```
/// use invoice_engine::calculation::{week_key, week_window_of};
/// use chrono::NaiveDate;
///
/// let window = week_window_of(NaiveDate::from_ymd_opt(2026, 1, 14).unwrap());
/// assert_eq!(week_key(&window).to_string(), "2026-01-12_2026-01-18");
/// ```
pub fn week_key(window: &WeekWindow) -> WeekKey {
    window.key()
}

/// Returns every week window intersecting `[range_start, range_end]`.
///
/// Partial weeks at either boundary are included. An inverted range yields
/// no weeks.
///
/// # Example
///
/// ```
/// use invoice_engine::calculation::enumerate_weeks;
/// use chrono::NaiveDate;
///
/// // Thursday 2026-01-01 to Saturday 2026-01-31
/// let weeks = enumerate_weeks(
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
/// );
/// assert_eq!(weeks.len(), 5);
/// assert_eq!(weeks[0].start_date, NaiveDate::from_ymd_opt(2025, 12, 29).unwrap());
/// assert_eq!(weeks[4].end_date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
/// ```
pub fn enumerate_weeks(range_start: NaiveDate, range_end: NaiveDate) -> Vec<WeekWindow> {
    let mut weeks = Vec::new();
    if range_end < range_start {
        return weeks;
    }

    let mut window = week_window_of(range_start);
    while window.start_date <= range_end {
        weeks.push(window);
        window = window.next();
    }
    weeks
}
