//! Week window value types.
//!
//! A [`WeekWindow`] is an immutable Monday..Sunday range; a [`WeekKey`] is its
//! ordered, serializable identifier.

use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const KEY_DATE_FORMAT: &str = "%Y-%m-%d";

/// A Monday-to-Sunday calendar week.
///
/// Deserialization rejects any range that is not a Monday followed by the
/// Sunday six days later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWeekWindow")]
pub struct WeekWindow {
    /// The Monday opening the week.
    pub start_date: NaiveDate,
    /// The Sunday closing the week.
    pub end_date: NaiveDate,
}

impl WeekWindow {
    /// Builds the window opening on `monday`.
    ///
    /// The caller guarantees `monday` is a Monday.
    pub(crate) fn starting(monday: NaiveDate) -> Self {
        debug_assert_eq!(monday.weekday(), Weekday::Mon);
        Self {
            start_date: monday,
            end_date: monday + Duration::days(6),
        }
    }

    /// Returns the identifier of this window.
    pub fn key(&self) -> WeekKey {
        WeekKey(self.start_date)
    }

    /// Returns the following week.
    pub fn next(&self) -> WeekWindow {
        WeekWindow::starting(self.start_date + Duration::days(7))
    }

    /// Checks if a given date falls within this week.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[derive(Deserialize)]
struct RawWeekWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl TryFrom<RawWeekWindow> for WeekWindow {
    type Error = String;

    fn try_from(raw: RawWeekWindow) -> Result<Self, Self::Error> {
        check_monday_to_sunday(raw.start_date, raw.end_date)?;
        Ok(WeekWindow::starting(raw.start_date))
    }
}

fn check_monday_to_sunday(start: NaiveDate, end: NaiveDate) -> Result<(), String> {
    if start.weekday() != Weekday::Mon || end != start + Duration::days(6) {
        return Err(format!("{}..{} is not a Monday-Sunday window", start, end));
    }
    Ok(())
}

/// Stable identifier of a [`WeekWindow`].
///
/// Orders chronologically and renders as `"<monday>_<sunday>"`, e.g.
/// `"2026-01-12_2026-01-18"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// Returns the window this key identifies.
    pub fn window(&self) -> WeekWindow {
        WeekWindow::starting(self.0)
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let window = self.window();
        write!(
            f,
            "{}_{}",
            window.start_date.format(KEY_DATE_FORMAT),
            window.end_date.format(KEY_DATE_FORMAT)
        )
    }
}

impl FromStr for WeekKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('_')
            .ok_or_else(|| format!("week key '{}' is not <monday>_<sunday>", s))?;
        let start = NaiveDate::parse_from_str(start, KEY_DATE_FORMAT).map_err(|e| e.to_string())?;
        let end = NaiveDate::parse_from_str(end, KEY_DATE_FORMAT).map_err(|e| e.to_string())?;
        check_monday_to_sunday(start, end).map_err(|e| format!("week key '{}': {}", s, e))?;
        Ok(WeekKey(start))
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
