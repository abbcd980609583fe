//! Weekly overtime split.
//!
//! This module splits an employee's weekly hours into normal hours and two
//! overtime tiers.
//!
//! ## Tier Structure
//!
//! - Up to 35h: normal hours
//! - From 35h to 43h: overtime at 125%
//! - Beyond 43h: overtime at 150%
//!
//! The split is per employee per week, regardless of how many contracts
//! contributed hours.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::OvertimePolicy;
use crate::models::TimeEntry;

/// The weekly hours split into tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeSplit {
    /// Sum of every entry's hours.
    pub total_week_hours: Decimal,
    /// Hours at the base rate.
    pub normal_hours: Decimal,
    /// Hours in the 125% band.
    pub overtime125: Decimal,
    /// Hours in the 150% band.
    pub overtime150: Decimal,
}

/// Splits the week's entries into normal and overtime hours.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use invoice_engine::calculation::split_overtime;
/// use invoice_engine::config::OvertimePolicy;
/// use invoice_engine::models::{TimeEntry, TimeEntryStatus};
/// use rust_decimal::Decimal;
///
/// let entry = |day: u32, contract: &str| TimeEntry {
///     id: format!("te_{}_{}", contract, day).into(),
///     employee_id: "emp_001".into(),
///     contract_id: contract.into(),
///     client_id: "cli_001".into(),
///     date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
///     start_time: None,
///     end_time: None,
///     break_minutes: 0,
///     total_hours: Decimal::new(5, 0),
///     normal_hours: Decimal::new(5, 0),
///     overtime_hours: Decimal::ZERO,
///     hourly_rate: None,
///     billing_rate: None,
///     status: TimeEntryStatus::Validated,
///     notes: String::new(),
///     created_at: Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap(),
///     updated_at: Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap(),
/// };
///
/// // Two contracts, 5h each from Monday to Friday: 50h in one week.
/// let week: Vec<TimeEntry> = (12..=16)
///     .flat_map(|day| [entry(day, "ctr_a"), entry(day, "ctr_b")])
///     .collect();
///
/// let split = split_overtime(&week, &OvertimePolicy::default());
/// assert_eq!(split.total_week_hours, Decimal::new(50, 0));
/// assert_eq!(split.overtime125, Decimal::new(8, 0));
/// assert_eq!(split.overtime150, Decimal::new(7, 0));
/// ```
pub fn split_overtime<'a, I>(week_entries: I, policy: &OvertimePolicy) -> OvertimeSplit
where
    I: IntoIterator<Item = &'a TimeEntry>,
{
    let total_week_hours = week_entries.into_iter().map(|e| e.total_hours).sum();
    split_hours(total_week_hours, policy)
}

/// Splits a weekly hour total into tiers.
///
/// # Example
///
/// ```
/// use invoice_engine::calculation::split_hours;
/// use invoice_engine::config::OvertimePolicy;
/// use rust_decimal::Decimal;
///
/// let split = split_hours(Decimal::new(50, 0), &OvertimePolicy::default());
/// assert_eq!(split.normal_hours, Decimal::new(35, 0));
/// assert_eq!(split.overtime125, Decimal::new(8, 0));
/// assert_eq!(split.overtime150, Decimal::new(7, 0));
/// ```
pub fn split_hours(total_week_hours: Decimal, policy: &OvertimePolicy) -> OvertimeSplit {
    let normal_ceiling = policy.normal_weekly_hours;
    let tier_125_ceiling = policy.tier_125_ceiling_hours;

    let (normal_hours, overtime125, overtime150) = if total_week_hours <= normal_ceiling {
        (total_week_hours, Decimal::ZERO, Decimal::ZERO)
    } else if total_week_hours <= tier_125_ceiling {
        (normal_ceiling, total_week_hours - normal_ceiling, Decimal::ZERO)
    } else {
        (
            normal_ceiling,
            policy.tier_125_band_hours(),
            total_week_hours - tier_125_ceiling,
        )
    };

    OvertimeSplit {
        total_week_hours,
        normal_hours,
        overtime125,
        overtime150,
    }
}
