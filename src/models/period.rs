//! Invoice period model.
//!
//! This module contains the [`InvoicePeriod`] type: the inclusive date range
//! an invoice bills for.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The inclusive date range billed by an invoice.
///
/// # Example
///
/// ```
/// use invoice_engine::models::InvoicePeriod;
/// use chrono::NaiveDate;
///
/// let period = InvoicePeriod::new(
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
/// )
/// .unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePeriod {
    /// First billed day (inclusive).
    pub start_date: NaiveDate,
    /// Last billed day (inclusive).
    pub end_date: NaiveDate,
}

impl InvoicePeriod {
    /// Creates a period, rejecting an end date before the start date.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if end_date < start_date {
            return Err(EngineError::validation(
                "period_end",
                format!("{} is before period start {}", end_date, start_date),
            ));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Checks if a given date falls within this period (inclusive on both ends).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Intersects the period with another inclusive range whose end may be open.
    ///
    /// Returns `None` when the ranges do not overlap.
    pub fn intersect(&self, start: NaiveDate, end: Option<NaiveDate>) -> Option<InvoicePeriod> {
        let start_date = self.start_date.max(start);
        let end_date = end.map_or(self.end_date, |end| self.end_date.min(end));
        (start_date <= end_date).then_some(InvoicePeriod {
            start_date,
            end_date,
        })
    }

    /// Iterates every day of the period in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |date| *date <= self.end_date)
    }
}
