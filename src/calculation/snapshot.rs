//! Invoice snapshot building.
//!
//! Freezes aggregated figures into an [`Invoice`]. Everything the invoice
//! displays is copied in: client fields, employee and contract names, and
//! the full weekly breakdown of every employee. References that no longer
//! resolve are replaced by labelled placeholders.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::models::{
    AggregateTotals, Client, ClientId, ClientSnapshot, EmployeeAggregateMap, Invoice,
    InvoiceFields, InvoiceId, InvoicePeriod, InvoicedWorkPeriod, TimeEntryId, WorkPeriod,
};

use super::DirectorySnapshot;

/// Identity and scope of the invoice being frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceHeader {
    /// Identifier of the new invoice.
    pub id: InvoiceId,
    /// Number printed on the invoice.
    pub invoice_number: String,
    /// The billed client.
    pub client_id: ClientId,
    /// The billed range.
    pub period: InvoicePeriod,
    /// Dates and notes chosen by the preparer.
    pub fields: InvoiceFields,
    /// Entries billed by this invoice.
    pub time_entry_ids: Vec<TimeEntryId>,
}

/// Builds frozen invoices.
#[derive(Clone)]
pub struct InvoiceSnapshotBuilder {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl InvoiceSnapshotBuilder {
    /// Creates a builder stamping snapshots with `clock`.
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Freezes `aggregates` into an invoice.
    ///
    /// `client` is `None` when the client could not be resolved. Only the
    /// selected work periods are embedded.
    pub fn build_snapshot(
        &self,
        header: InvoiceHeader,
        client: Option<&Client>,
        selected_work_periods: &[WorkPeriod],
        aggregates: EmployeeAggregateMap,
        lookups: &DirectorySnapshot,
    ) -> Invoice {
        let invoicing = self.config.invoicing();

        let client_snapshot = match client {
            Some(client) => ClientSnapshot::from_client(client),
            None => {
                warn!(client_id = %header.client_id, "Unknown client, using placeholder");
                ClientSnapshot::placeholder(header.client_id.clone(), &invoicing.unknown_client_label)
            }
        };

        let work_periods: Vec<InvoicedWorkPeriod> = selected_work_periods
            .iter()
            .filter(|wp| wp.selected)
            .map(|wp| self.describe_work_period(wp, lookups))
            .collect();

        let global_totals: AggregateTotals = aggregates.values().map(|a| &a.totals).sum();
        let vat_rate = invoicing.vat_rate;
        let vat_amount = to_cents(global_totals.total_amount * vat_rate);
        let total_including_vat = to_cents(global_totals.total_amount + vat_amount);

        let due_date = header.fields.due_date.unwrap_or_else(|| {
            derive_due_date(
                header.fields.invoice_date,
                client.and_then(|c| c.payment_terms_days),
                invoicing.default_payment_terms_days,
            )
        });

        let invoice = Invoice {
            id: header.id,
            invoice_number: header.invoice_number,
            client: client_snapshot,
            period: header.period,
            invoice_date: header.fields.invoice_date,
            due_date,
            currency: invoicing.currency.clone(),
            work_periods,
            global_totals,
            employees_data: aggregates.into_values().collect(),
            vat_rate,
            vat_amount,
            total_including_vat,
            notes: header.fields.notes,
            time_entry_ids: header.time_entry_ids,
            is_finalized: true,
            finalized_at: self.clock.now(),
        };

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            employees = invoice.employees_data.len(),
            total_amount = %invoice.global_totals.total_amount,
            "Invoice snapshot built"
        );
        invoice
    }

    fn describe_work_period(
        &self,
        work_period: &WorkPeriod,
        lookups: &DirectorySnapshot,
    ) -> InvoicedWorkPeriod {
        let invoicing = self.config.invoicing();
        let employee = lookups.employee(&work_period.employee_id);
        let contract = lookups.contract(&work_period.contract_id);

        if employee.is_none() || contract.is_none() {
            warn!(
                employee_id = %work_period.employee_id,
                contract_id = %work_period.contract_id,
                "Work period references unknown records, using placeholders"
            );
        }

        InvoicedWorkPeriod {
            work_period: work_period.clone(),
            employee_name: employee
                .map_or_else(|| invoicing.unknown_employee_label.clone(), |e| e.full_name()),
            contract_title: contract
                .map_or_else(|| invoicing.unknown_contract_label.clone(), |c| c.title.clone()),
            contract_location: contract.map(|c| c.location.clone()).unwrap_or_default(),
            is_placeholder: employee.is_none() || contract.is_none(),
        }
    }
}

/// Due date from payment terms: the client's when set, else the default.
pub fn derive_due_date(
    invoice_date: NaiveDate,
    client_terms_days: Option<u32>,
    default_terms_days: u32,
) -> NaiveDate {
    let days = client_terms_days.unwrap_or(default_terms_days);
    invoice_date + Duration::days(i64::from(days))
}

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
