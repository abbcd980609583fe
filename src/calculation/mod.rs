//! Calculation logic for the invoice engine.
//!
//! This module contains the weekly billing pipeline: week bucketing, the
//! tiered overtime split, hours-weighted rate resolution, weekly cost,
//! per-employee aggregation and the frozen invoice snapshot. It also derives
//! the candidate work periods of an invoice and selects the billable entries.
//!
//! Everything here is synchronous and pure except the metadata prefetch in
//! [`DirectorySnapshot::prefetch`] and [`EmployeeAggregator`].

mod employee_aggregator;
mod lookups;
mod overtime;
mod rate_resolver;
mod snapshot;
mod week_bucketer;
mod weekly_cost;
mod work_periods;

pub use employee_aggregator::{EmployeeAggregator, aggregate_entries, employee_ref};
pub use lookups::DirectorySnapshot;
pub use overtime::{OvertimeSplit, split_hours, split_overtime};
pub use rate_resolver::{WeeklyRate, resolve_weekly_billing_rate};
pub use snapshot::{InvoiceHeader, InvoiceSnapshotBuilder, derive_due_date};
pub use week_bucketer::{enumerate_weeks, week_key, week_window_of};
pub use weekly_cost::compute_week;
pub use work_periods::{generate_work_periods, select_entries};
