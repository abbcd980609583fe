//! Invoicing workflow.
//!
//! [`InvoicingService`] wires the stores, the directories and the calculators
//! together. It is constructed once at startup with every collaborator
//! injected. Aggregation and preview never write; [`InvoicingService::finalize`]
//! performs a single batched write at the very end, so abandoning it earlier
//! leaves nothing behind.

use std::sync::Arc;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    DirectorySnapshot, EmployeeAggregator, InvoiceHeader, InvoiceSnapshotBuilder,
    aggregate_entries, generate_work_periods, select_entries,
};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AggregateTotals, Client, ClientId, EmployeeAggregate, EmployeeAggregateMap, Invoice,
    InvoiceFields, InvoiceId, InvoicePeriod, TimeEntry, TimeEntryId, TimeEntryInput, WorkPeriod,
};
use crate::store::{
    ClientDirectory, ContractDirectory, EmployeeDirectory, InvoiceStore, KeyValueDirectory,
    KeyValueStore, TimeEntryStore,
};

/// The directories the workflow reads from.
#[derive(Clone)]
pub struct Directories {
    /// Employee lookups.
    pub employees: Arc<dyn EmployeeDirectory>,
    /// Contract lookups.
    pub contracts: Arc<dyn ContractDirectory>,
    /// Client lookups.
    pub clients: Arc<dyn ClientDirectory>,
}

impl Directories {
    /// Uses one [`KeyValueDirectory`] for all three lookups.
    pub fn from_key_value(directory: Arc<KeyValueDirectory>) -> Self {
        Self {
            employees: directory.clone(),
            contracts: directory.clone(),
            clients: directory,
        }
    }
}

/// What to invoice: a client, a range and optionally the preparer's choice
/// of work periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    /// The billed client.
    pub client_id: ClientId,
    /// The billed range.
    pub period: InvoicePeriod,
    /// Work periods as ticked by the preparer; generated from the client's
    /// contracts, all selected, when absent.
    #[serde(default)]
    pub work_periods: Option<Vec<WorkPeriod>>,
}

/// Figures shown before finalizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePreview {
    /// The billed client.
    pub client_id: ClientId,
    /// The billed range.
    pub period: InvoicePeriod,
    /// Every candidate work period, selected or not.
    pub work_periods: Vec<WorkPeriod>,
    /// Per-employee weekly tables.
    pub employees: Vec<EmployeeAggregate>,
    /// Sum over every employee.
    pub global_totals: AggregateTotals,
    /// Entries that finalizing would bill.
    pub time_entry_ids: Vec<TimeEntryId>,
}

/// Intermediate state shared by preview and finalize.
struct Prepared {
    work_periods: Vec<WorkPeriod>,
    entries: Vec<TimeEntry>,
    lookups: DirectorySnapshot,
    aggregates: EmployeeAggregateMap,
}

/// Time entry management and invoice creation.
#[derive(Clone)]
pub struct InvoicingService {
    config: EngineConfig,
    store: Arc<dyn KeyValueStore>,
    time_entries: TimeEntryStore,
    invoices: InvoiceStore,
    directories: Directories,
    aggregator: EmployeeAggregator,
    snapshots: InvoiceSnapshotBuilder,
}

impl InvoicingService {
    /// Assembles the service from its collaborators.
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn KeyValueStore>,
        directories: Directories,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let time_entries = TimeEntryStore::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            config.time_entries().clone(),
        );
        let invoices = InvoiceStore::new(Arc::clone(&store));
        let aggregator = EmployeeAggregator::new(
            Arc::clone(&directories.employees),
            Arc::clone(&directories.contracts),
            config.clone(),
        );
        let snapshots = InvoiceSnapshotBuilder::new(config.clone(), clock);

        Self {
            config,
            store,
            time_entries,
            invoices,
            directories,
            aggregator,
            snapshots,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the time entry store.
    pub fn time_entries(&self) -> &TimeEntryStore {
        &self.time_entries
    }

    /// Returns the invoice store.
    pub fn invoices(&self) -> &InvoiceStore {
        &self.invoices
    }

    /// Candidate work periods of a client over `period`, all selected.
    pub async fn work_periods(
        &self,
        client_id: &ClientId,
        period: &InvoicePeriod,
    ) -> EngineResult<Vec<WorkPeriod>> {
        let contracts = self.directories.contracts.list_by_client(client_id).await?;
        Ok(generate_work_periods(
            &contracts,
            period,
            self.config.time_entries(),
        ))
    }

    /// Aggregates without writing anything.
    pub async fn preview(&self, request: &InvoiceRequest) -> EngineResult<InvoicePreview> {
        let prepared = self.prepare(request).await?;
        let global_totals: AggregateTotals = prepared.aggregates.values().map(|a| &a.totals).sum();

        Ok(InvoicePreview {
            client_id: request.client_id.clone(),
            period: request.period,
            work_periods: prepared.work_periods,
            time_entry_ids: prepared.entries.iter().map(|e| e.id.clone()).collect(),
            employees: prepared.aggregates.into_values().collect(),
            global_totals,
        })
    }

    /// Freezes the invoice and marks its entries invoiced.
    ///
    /// The invoice and the updated time entries are written in one batch;
    /// on any error nothing is written.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] when no work period is selected or the due
    /// date precedes the invoice date, [`EngineError::Conflict`] when an entry
    /// changed status meanwhile, and any storage error.
    pub async fn finalize(
        &self,
        request: &InvoiceRequest,
        fields: InvoiceFields,
    ) -> EngineResult<Invoice> {
        if let Some(due_date) = fields.due_date {
            if due_date < fields.invoice_date {
                return Err(EngineError::validation(
                    "due_date",
                    format!("{} is before invoice date {}", due_date, fields.invoice_date),
                ));
            }
        }

        let prepared = self.prepare(request).await?;
        let selected: Vec<WorkPeriod> = prepared
            .work_periods
            .iter()
            .filter(|wp| wp.selected)
            .cloned()
            .collect();
        if selected.is_empty() {
            return Err(EngineError::validation(
                "work_periods",
                "select at least one work period",
            ));
        }

        let client = self.lookup_client(&request.client_id).await?;
        let invoicing = self.config.invoicing();
        let invoice_number = self
            .invoices
            .next_invoice_number(
                &invoicing.invoice_number_prefix,
                fields.invoice_date.year(),
            )
            .await?;
        let time_entry_ids: Vec<TimeEntryId> =
            prepared.entries.iter().map(|e| e.id.clone()).collect();

        let header = InvoiceHeader {
            id: InvoiceId::new(Uuid::new_v4().to_string()),
            invoice_number,
            client_id: request.client_id.clone(),
            period: request.period,
            fields,
            time_entry_ids: time_entry_ids.clone(),
        };
        let invoice = self.snapshots.build_snapshot(
            header,
            client.as_ref(),
            &selected,
            prepared.aggregates,
            &prepared.lookups,
        );

        let mut writes = vec![self.invoices.prepare_insert(&invoice).await?];
        if !time_entry_ids.is_empty() {
            writes.push(self.time_entries.prepare_invoiced(&time_entry_ids).await?);
        }
        self.store.set_many(writes).await?;

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            client_id = %request.client_id,
            entries = time_entry_ids.len(),
            total_including_vat = %invoice.total_including_vat,
            "Invoice finalized"
        );
        Ok(invoice)
    }

    /// Reads a frozen invoice.
    pub async fn get_invoice(&self, id: &InvoiceId) -> EngineResult<Invoice> {
        self.invoices.get_by_id(id).await
    }

    /// Lists a client's invoices, most recent first.
    pub async fn list_invoices(&self, client_id: &ClientId) -> EngineResult<Vec<Invoice>> {
        self.invoices.list_by_client(client_id).await
    }

    /// Records a new draft time entry.
    pub async fn create_time_entry(&self, input: TimeEntryInput) -> EngineResult<TimeEntry> {
        self.time_entries.create(input).await
    }

    /// Edits a time entry that is not invoiced.
    pub async fn update_time_entry(
        &self,
        id: &TimeEntryId,
        input: TimeEntryInput,
    ) -> EngineResult<TimeEntry> {
        self.time_entries.update(id, input).await
    }

    /// Validates a draft time entry.
    pub async fn validate_time_entry(&self, id: &TimeEntryId) -> EngineResult<TimeEntry> {
        self.time_entries.validate(id).await
    }

    /// Deletes a time entry that is not invoiced.
    pub async fn delete_time_entry(&self, id: &TimeEntryId) -> EngineResult<()> {
        self.time_entries.delete(id).await
    }

    async fn prepare(&self, request: &InvoiceRequest) -> EngineResult<Prepared> {
        let work_periods = match &request.work_periods {
            Some(work_periods) => work_periods.clone(),
            None => self.work_periods(&request.client_id, &request.period).await?,
        };

        let mut entries = self.time_entries.list_in_period(&request.period).await?;
        entries.retain(|e| e.client_id == request.client_id);
        let entries = select_entries(&entries, &work_periods, &request.period);

        let selected: Vec<WorkPeriod> =
            work_periods.iter().filter(|wp| wp.selected).cloned().collect();
        let lookups = self.aggregator.prefetch(&entries, &selected).await;
        let aggregates =
            aggregate_entries(&entries, &request.period, &selected, &lookups, &self.config);

        info!(
            client_id = %request.client_id,
            period_start = %request.period.start_date,
            period_end = %request.period.end_date,
            entries = entries.len(),
            employees = aggregates.len(),
            "Invoice figures aggregated"
        );

        Ok(Prepared {
            work_periods,
            entries,
            lookups,
            aggregates,
        })
    }

    /// Resolves the client; a missing client becomes a placeholder downstream.
    async fn lookup_client(&self, client_id: &ClientId) -> EngineResult<Option<Client>> {
        match self.directories.clients.get_by_id(client_id).await {
            Ok(client) => Ok(Some(client)),
            Err(error) if error.is_not_found() => {
                warn!(client_id = %client_id, "Client not found");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}
