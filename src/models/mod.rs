//! Core data models for the invoice engine.
//!
//! This module contains all the domain models used throughout the engine.

mod aggregate;
mod directory;
mod ids;
mod invoice;
mod period;
mod time_entry;
mod week;
mod work_period;

pub use aggregate::{
    AggregateTotals, EmployeeAggregate, EmployeeAggregateMap, EmployeeRef, RateContribution,
    RateSource, WeeklyCalculation,
};
pub use directory::{Client, Contract, Employee};
pub use ids::{ClientId, ContractId, EmployeeId, InvoiceId, TimeEntryId};
pub use invoice::{ClientSnapshot, Invoice, InvoiceFields, InvoicedWorkPeriod};
pub use period::InvoicePeriod;
pub use time_entry::{TimeEntry, TimeEntryInput, TimeEntryStatus, split_daily_hours};
pub use week::{WeekKey, WeekWindow};
pub use work_period::WorkPeriod;
