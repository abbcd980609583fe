//! Time entry model and related types.
//!
//! This module defines the [`TimeEntry`] record (one employee, one contract,
//! one day), its status lifecycle, and the [`TimeEntryInput`] used to create
//! or edit entries.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TimeEntryRules;
use crate::error::{EngineError, EngineResult};

use super::{ClientId, ContractId, EmployeeId, TimeEntryId};

/// Lifecycle status of a time entry.
///
/// `draft -> validated -> invoiced`. No transition skips a state and
/// `invoiced` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEntryStatus {
    /// Freshly recorded, freely editable.
    Draft,
    /// Checked by the preparer, still editable, billable.
    Validated,
    /// Frozen into an invoice snapshot.
    Invoiced,
}

impl TimeEntryStatus {
    /// Returns true while the entry may still be edited or deleted.
    pub fn is_editable(self) -> bool {
        !matches!(self, TimeEntryStatus::Invoiced)
    }
}

impl std::fmt::Display for TimeEntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeEntryStatus::Draft => write!(f, "draft"),
            TimeEntryStatus::Validated => write!(f, "validated"),
            TimeEntryStatus::Invoiced => write!(f, "invoiced"),
        }
    }
}

/// One day's recorded hours for one employee under one contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier.
    pub id: TimeEntryId,
    /// The employee who worked.
    pub employee_id: EmployeeId,
    /// The contract the hours were worked under.
    pub contract_id: ContractId,
    /// The client billed for the contract.
    pub client_id: ClientId,
    /// The calendar day worked.
    pub date: NaiveDate,
    /// Start of work, when recorded as a time span.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// End of work, when recorded as a time span.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Unpaid break taken during the span, in minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// Hours worked that day.
    pub total_hours: Decimal,
    /// Part of `total_hours` within the daily normal hours.
    pub normal_hours: Decimal,
    /// Part of `total_hours` beyond the daily normal hours.
    pub overtime_hours: Decimal,
    /// Pay rate owed to the employee.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Rate charged to the client.
    #[serde(default)]
    pub billing_rate: Option<Decimal>,
    /// Lifecycle status.
    pub status: TimeEntryStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was last modified.
    pub updated_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Returns true when the entry can be billed on a new invoice.
    pub fn is_billable(&self) -> bool {
        self.status == TimeEntryStatus::Validated
    }

    /// Returns true when the entry occupies the given (employee, contract, date) slot.
    pub fn same_slot(
        &self,
        employee_id: &EmployeeId,
        contract_id: &ContractId,
        date: NaiveDate,
    ) -> bool {
        &self.employee_id == employee_id && &self.contract_id == contract_id && self.date == date
    }
}

/// Data supplied to create or edit a time entry.
///
/// Hours are taken from `start_time`/`end_time`/`break_minutes` when both
/// times are present, otherwise from `total_hours`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntryInput {
    /// The employee who worked.
    pub employee_id: EmployeeId,
    /// The contract the hours were worked under.
    pub contract_id: ContractId,
    /// The client billed for the contract.
    pub client_id: ClientId,
    /// The calendar day worked.
    pub date: NaiveDate,
    /// Start of work.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// End of work.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Unpaid break in minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// Hours worked, when no time span is given.
    #[serde(default)]
    pub total_hours: Option<Decimal>,
    /// Pay rate owed to the employee.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Rate charged to the client.
    #[serde(default)]
    pub billing_rate: Option<Decimal>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl TimeEntryInput {
    /// Validates the input and returns the worked hours.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] when an identifier is blank, the
    /// date is after `today`, the break is out of range, the end time is
    /// before the start time, hours exceed the daily cap, or hours and rates
    /// are negative or missing.
    ///
    /// # Example
    ///
    /// ```
    /// use invoice_engine::config::TimeEntryRules;
    /// use invoice_engine::models::TimeEntryInput;
    /// use chrono::{NaiveDate, NaiveTime};
    /// use rust_decimal::Decimal;
    ///
    /// let input = TimeEntryInput {
    ///     employee_id: "emp_001".into(),
    ///     contract_id: "ctr_001".into(),
    ///     client_id: "cli_001".into(),
    ///     date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
    ///     start_time: NaiveTime::from_hms_opt(9, 0, 0),
    ///     end_time: NaiveTime::from_hms_opt(17, 30, 0),
    ///     break_minutes: 30,
    ///     total_hours: None,
    ///     hourly_rate: None,
    ///     billing_rate: None,
    ///     notes: String::new(),
    /// };
    /// let today = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
    /// let hours = input.validate(today, &TimeEntryRules::default()).unwrap();
    /// assert_eq!(hours, Decimal::new(8, 0));
    /// ```
    pub fn validate(&self, today: NaiveDate, rules: &TimeEntryRules) -> EngineResult<Decimal> {
        if self.employee_id.is_blank() {
            return Err(EngineError::validation("employee_id", "is required"));
        }
        if self.contract_id.is_blank() {
            return Err(EngineError::validation("contract_id", "is required"));
        }
        if self.client_id.is_blank() {
            return Err(EngineError::validation("client_id", "is required"));
        }
        if self.date > today {
            return Err(EngineError::validation(
                "date",
                format!("{} is in the future", self.date),
            ));
        }
        if self.break_minutes > rules.max_break_minutes {
            return Err(EngineError::validation(
                "break_minutes",
                format!("must be within [0, {}]", rules.max_break_minutes),
            ));
        }
        for (field, rate) in [("hourly_rate", self.hourly_rate), ("billing_rate", self.billing_rate)] {
            if rate.is_some_and(|r| r < Decimal::ZERO) {
                return Err(EngineError::validation(field, "must not be negative"));
            }
        }

        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                if end < start {
                    return Err(EngineError::validation(
                        "end_time",
                        "end time is before start time",
                    ));
                }
                let worked_minutes = (end - start).num_minutes() - i64::from(self.break_minutes);
                if worked_minutes < 0 {
                    return Err(EngineError::validation(
                        "break_minutes",
                        "break is longer than the worked span",
                    ));
                }
                within_daily_cap(Decimal::new(worked_minutes, 0) / Decimal::new(60, 0), rules)
            }
            (None, None) => match self.total_hours {
                Some(hours) if hours < Decimal::ZERO => {
                    Err(EngineError::validation("total_hours", "must not be negative"))
                }
                Some(hours) => within_daily_cap(hours, rules),
                None => Err(EngineError::validation(
                    "total_hours",
                    "is required when no start and end time are given",
                )),
            },
            _ => Err(EngineError::validation(
                "start_time",
                "start and end time must be given together",
            )),
        }
    }
}

fn within_daily_cap(hours: Decimal, rules: &TimeEntryRules) -> EngineResult<Decimal> {
    if hours > rules.max_daily_hours {
        return Err(EngineError::validation(
            "total_hours",
            format!("must not exceed {} hours per day", rules.max_daily_hours),
        ));
    }
    Ok(hours)
}

/// Splits a day's hours at the daily normal threshold.
///
/// Returns `(normal_hours, overtime_hours)`. This is the informational split
/// stored on the entry; invoices use the weekly tiers instead.
pub fn split_daily_hours(total_hours: Decimal, rules: &TimeEntryRules) -> (Decimal, Decimal) {
    if total_hours <= rules.daily_normal_hours {
        (total_hours, Decimal::ZERO)
    } else {
        (rules.daily_normal_hours, total_hours - rules.daily_normal_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
    }

    fn create_input() -> TimeEntryInput {
        TimeEntryInput {
            employee_id: "emp_001".into(),
            contract_id: "ctr_001".into(),
            client_id: "cli_001".into(),
            date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            start_time: None,
            end_time: None,
            break_minutes: 0,
            total_hours: Some(dec("8")),
            hourly_rate: Some(dec("15")),
            billing_rate: Some(dec("20")),
            notes: String::new(),
        }
    }

    #[test]
    fn test_total_hours_used_without_times() {
        let hours = create_input().validate(today(), &TimeEntryRules::default()).unwrap();
        assert_eq!(hours, dec("8"));
    }

    #[test]
    fn test_hours_from_span_minus_break() {
        let mut input = create_input();
        input.start_time = NaiveTime::from_hms_opt(8, 0, 0);
        input.end_time = NaiveTime::from_hms_opt(17, 45, 0);
        input.break_minutes = 45;
        input.total_hours = None;

        let hours = input.validate(today(), &TimeEntryRules::default()).unwrap();
        assert_eq!(hours, dec("9"));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut input = create_input();
        input.start_time = NaiveTime::from_hms_opt(17, 0, 0);
        input.end_time = NaiveTime::from_hms_opt(9, 0, 0);

        let err = input.validate(today(), &TimeEntryRules::default()).unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "end_time"));
    }

    #[test]
    fn test_future_date_rejected() {
        let mut input = create_input();
        input.date = NaiveDate::from_ymd_opt(2026, 1, 21).unwrap();

        let err = input.validate(today(), &TimeEntryRules::default()).unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "date"));
    }

    #[test]
    fn test_today_accepted() {
        let mut input = create_input();
        input.date = today();
        assert!(input.validate(today(), &TimeEntryRules::default()).is_ok());
    }

    #[test]
    fn test_break_bounds() {
        let mut input = create_input();
        input.break_minutes = 480;
        assert!(input.validate(today(), &TimeEntryRules::default()).is_ok());

        input.break_minutes = 481;
        let err = input.validate(today(), &TimeEntryRules::default()).unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "break_minutes"));
    }

    #[test]
    fn test_daily_hours_cap() {
        let mut input = create_input();
        input.total_hours = Some(dec("24"));
        assert_eq!(input.validate(today(), &TimeEntryRules::default()).unwrap(), dec("24"));

        input.total_hours = Some(dec("24.01"));
        let err = input.validate(today(), &TimeEntryRules::default()).unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "total_hours"));
    }

    #[test]
    fn test_huge_hours_rejected_before_billing() {
        let mut input = create_input();
        input.total_hours = Some(dec("100000000000000000000"));
        input.billing_rate = Some(dec("10000000000"));

        let err = input.validate(today(), &TimeEntryRules::default()).unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "total_hours"));
    }

    #[test]
    fn test_blank_ids_rejected() {
        let mut input = create_input();
        input.employee_id = "".into();
        assert!(input.validate(today(), &TimeEntryRules::default()).is_err());

        let mut input = create_input();
        input.contract_id = " ".into();
        assert!(input.validate(today(), &TimeEntryRules::default()).is_err());
    }

    #[test]
    fn test_missing_hours_rejected() {
        let mut input = create_input();
        input.total_hours = None;
        assert!(input.validate(today(), &TimeEntryRules::default()).is_err());
    }

    #[test]
    fn test_half_span_rejected() {
        let mut input = create_input();
        input.start_time = NaiveTime::from_hms_opt(9, 0, 0);
        assert!(input.validate(today(), &TimeEntryRules::default()).is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut input = create_input();
        input.billing_rate = Some(dec("-1"));
        assert!(input.validate(today(), &TimeEntryRules::default()).is_err());
    }

    #[test]
    fn test_split_daily_hours() {
        let rules = TimeEntryRules::default();
        assert_eq!(split_daily_hours(dec("6"), &rules), (dec("6"), dec("0")));
        assert_eq!(split_daily_hours(dec("10"), &rules), (dec("7"), dec("3")));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&TimeEntryStatus::Validated).unwrap(),
            "\"validated\""
        );
        assert!(TimeEntryStatus::Draft.is_editable());
        assert!(!TimeEntryStatus::Invoiced.is_editable());
    }
}
