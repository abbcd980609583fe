//! Per-employee weekly aggregation.
//!
//! ## Steps
//!
//! 1. Every week intersecting the period gets an empty bucket per employee.
//! 2. Entries inside the period are dropped into their employee's week bucket.
//! 3. Each non-empty bucket is computed with [`compute_week`]; empty ones are
//!    discarded.
//! 4. Employees of selected work periods with no entries still appear, with
//!    zero totals.
//!
//! [`aggregate_entries`] is pure. [`EmployeeAggregator`] adds the metadata
//! prefetch in front of it.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::models::{
    AggregateTotals, EmployeeAggregate, EmployeeAggregateMap, EmployeeId, EmployeeRef,
    InvoicePeriod, TimeEntry, WeekKey, WorkPeriod,
};
use crate::store::{ContractDirectory, EmployeeDirectory};

use super::{DirectorySnapshot, compute_week, enumerate_weeks, week_key, week_window_of};

type WeekBuckets = BTreeMap<WeekKey, Vec<TimeEntry>>;

/// Aggregates `entries` per employee and week over `period`.
///
/// Entries outside `period` are ignored. The caller decides which entries
/// are billable; see [`select_entries`](super::select_entries).
pub fn aggregate_entries(
    entries: &[TimeEntry],
    period: &InvoicePeriod,
    selected_work_periods: &[WorkPeriod],
    lookups: &DirectorySnapshot,
    config: &EngineConfig,
) -> EmployeeAggregateMap {
    let weeks = enumerate_weeks(period.start_date, period.end_date);
    let empty_buckets: WeekBuckets = weeks.iter().map(|w| (week_key(w), Vec::new())).collect();

    let mut grouped: BTreeMap<EmployeeId, WeekBuckets> = BTreeMap::new();
    for entry in entries.iter().filter(|e| period.contains_date(e.date)) {
        let key = week_key(&week_window_of(entry.date));
        grouped
            .entry(entry.employee_id.clone())
            .or_insert_with(|| empty_buckets.clone())
            .entry(key)
            .or_default()
            .push(entry.clone());
    }

    let mut aggregates = EmployeeAggregateMap::new();
    for (employee_id, buckets) in grouped {
        let mut aggregate = empty_aggregate(&employee_id, lookups, config);
        for (key, bucket) in buckets.into_iter().filter(|(_, b)| !b.is_empty()) {
            let week = compute_week(key.window(), &bucket, period, lookups, config.overtime());
            aggregate.totals.add_week(&week);
            aggregate.weeks.insert(key, week);
        }
        debug!(
            employee_id = %employee_id,
            weeks = aggregate.weeks.len(),
            total_amount = %aggregate.totals.total_amount,
            "Employee aggregated"
        );
        aggregates.insert(employee_id, aggregate);
    }

    for work_period in selected_work_periods.iter().filter(|wp| wp.selected) {
        if !aggregates.contains_key(&work_period.employee_id) {
            aggregates.insert(
                work_period.employee_id.clone(),
                empty_aggregate(&work_period.employee_id, lookups, config),
            );
        }
    }

    aggregates
}

/// Describes an employee from the prefetched metadata, or as a placeholder.
pub fn employee_ref(
    employee_id: &EmployeeId,
    lookups: &DirectorySnapshot,
    config: &EngineConfig,
) -> EmployeeRef {
    match lookups.employee(employee_id) {
        Some(employee) => EmployeeRef {
            id: employee_id.clone(),
            name: employee.full_name(),
            position: employee.position.clone(),
            is_placeholder: false,
        },
        None => {
            warn!(employee_id = %employee_id, "Unknown employee, using placeholder");
            EmployeeRef {
                id: employee_id.clone(),
                name: config.invoicing().unknown_employee_label.clone(),
                position: String::new(),
                is_placeholder: true,
            }
        }
    }
}

fn empty_aggregate(
    employee_id: &EmployeeId,
    lookups: &DirectorySnapshot,
    config: &EngineConfig,
) -> EmployeeAggregate {
    EmployeeAggregate {
        employee: employee_ref(employee_id, lookups, config),
        weeks: BTreeMap::new(),
        totals: AggregateTotals::default(),
    }
}

/// Aggregation with directory lookups.
#[derive(Clone)]
pub struct EmployeeAggregator {
    employees: Arc<dyn EmployeeDirectory>,
    contracts: Arc<dyn ContractDirectory>,
    config: EngineConfig,
}

impl EmployeeAggregator {
    /// Creates an aggregator reading metadata from the given directories.
    pub fn new(
        employees: Arc<dyn EmployeeDirectory>,
        contracts: Arc<dyn ContractDirectory>,
        config: EngineConfig,
    ) -> Self {
        Self {
            employees,
            contracts,
            config,
        }
    }

    /// Fetches the metadata referenced by `entries` and `work_periods`.
    pub async fn prefetch(
        &self,
        entries: &[TimeEntry],
        work_periods: &[WorkPeriod],
    ) -> DirectorySnapshot {
        DirectorySnapshot::prefetch(
            self.employees.as_ref(),
            self.contracts.as_ref(),
            entries,
            work_periods,
        )
        .await
    }

    /// Prefetches metadata, then aggregates.
    ///
    /// Lookup failures degrade to placeholders and zero rates; this never fails.
    pub async fn aggregate(
        &self,
        entries: &[TimeEntry],
        period: &InvoicePeriod,
        selected_work_periods: &[WorkPeriod],
    ) -> EmployeeAggregateMap {
        let lookups = self.prefetch(entries, selected_work_periods).await;
        aggregate_entries(entries, period, selected_work_periods, &lookups, &self.config)
    }
}
