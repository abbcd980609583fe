//! Work period model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ContractId, EmployeeId, TimeEntry};

/// A candidate billable block: one contract intersected with the invoice range.
///
/// The estimates are informational; billed figures always come from the
/// weekly aggregation of time entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPeriod {
    /// The employee placed under the contract.
    pub employee_id: EmployeeId,
    /// The contract.
    pub contract_id: ContractId,
    /// First day of the block (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the block (inclusive).
    pub end_date: NaiveDate,
    /// Monday-to-Friday days in the block.
    pub estimated_working_days: u32,
    /// Contracted hours over those days.
    pub estimated_hours: Decimal,
    /// Billing rate used for the estimate.
    pub billing_rate: Decimal,
    /// `estimated_hours × billing_rate`.
    pub estimated_amount: Decimal,
    /// Whether the preparer includes the block in the invoice.
    pub selected: bool,
}

impl WorkPeriod {
    /// Returns true when the entry belongs to this block.
    pub fn covers(&self, entry: &TimeEntry) -> bool {
        entry.employee_id == self.employee_id
            && entry.contract_id == self.contract_id
            && entry.date >= self.start_date
            && entry.date <= self.end_date
    }
}
