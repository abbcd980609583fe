//! Employee and contract metadata prefetch.
//!
//! The aggregation loop never calls a directory itself. Every distinct
//! employee and contract id is fetched once up front, concurrently, and the
//! results are handed to the pure calculators as a [`DirectorySnapshot`].
//! Lookups that fail are logged and left out; callers fall back to
//! placeholders or a zero rate.

use std::collections::{BTreeSet, HashMap};

use futures::future::join_all;
use tracing::{debug, warn};

use crate::models::{Contract, ContractId, Employee, EmployeeId, TimeEntry, WorkPeriod};
use crate::store::{ContractDirectory, EmployeeDirectory};

/// Employee and contract metadata resolved for one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    employees: HashMap<EmployeeId, Employee>,
    contracts: HashMap<ContractId, Contract>,
}

impl DirectorySnapshot {
    /// Builds a snapshot from already resolved records.
    pub fn from_records(
        employees: impl IntoIterator<Item = Employee>,
        contracts: impl IntoIterator<Item = Contract>,
    ) -> Self {
        Self {
            employees: employees.into_iter().map(|e| (e.id.clone(), e)).collect(),
            contracts: contracts.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    /// Fetches every employee and contract referenced by `entries` or
    /// `work_periods`.
    ///
    /// Each id is requested once. All requests run concurrently.
    pub async fn prefetch(
        employees: &dyn EmployeeDirectory,
        contracts: &dyn ContractDirectory,
        entries: &[TimeEntry],
        work_periods: &[WorkPeriod],
    ) -> Self {
        let employee_ids: BTreeSet<&EmployeeId> = entries
            .iter()
            .map(|e| &e.employee_id)
            .chain(work_periods.iter().map(|wp| &wp.employee_id))
            .collect();
        let contract_ids: BTreeSet<&ContractId> = entries
            .iter()
            .map(|e| &e.contract_id)
            .chain(work_periods.iter().map(|wp| &wp.contract_id))
            .collect();

        debug!(
            employees = employee_ids.len(),
            contracts = contract_ids.len(),
            "Prefetching directory metadata"
        );

        let employee_lookups = join_all(
            employee_ids
                .iter()
                .map(|id| async move { (*id, employees.get_by_id(id).await) }),
        );
        let contract_lookups = join_all(
            contract_ids
                .iter()
                .map(|id| async move { (*id, contracts.get_by_id(id).await) }),
        );
        let (employee_results, contract_results) =
            futures::join!(employee_lookups, contract_lookups);

        let mut snapshot = Self::default();
        for (id, result) in employee_results {
            match result {
                Ok(employee) => {
                    snapshot.employees.insert(id.clone(), employee);
                }
                Err(error) => warn!(employee_id = %id, error = %error, "Employee lookup failed"),
            }
        }
        for (id, result) in contract_results {
            match result {
                Ok(contract) => {
                    snapshot.contracts.insert(id.clone(), contract);
                }
                Err(error) => warn!(contract_id = %id, error = %error, "Contract lookup failed"),
            }
        }
        snapshot
    }

    /// Returns the employee when it resolved.
    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.get(id)
    }

    /// Returns the contract when it resolved.
    pub fn contract(&self, id: &ContractId) -> Option<&Contract> {
        self.contracts.get(id)
    }
}
