//! Invoice snapshot store.
//!
//! Snapshots are append-only: once a finalized invoice is stored, nothing in
//! the engine replaces or edits it.

use std::sync::Arc;

use crate::error::{EngineError, EngineResult};
use crate::models::{ClientId, Invoice, InvoiceId};

use super::KeyValueStore;
use super::collection::{INVOICES_KEY, JsonCollection};

/// Durable collection of finalized invoices.
#[derive(Clone)]
pub struct InvoiceStore {
    invoices: JsonCollection<Invoice>,
}

impl InvoiceStore {
    /// Binds the store to the `invoices` key of `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            invoices: JsonCollection::new(store, INVOICES_KEY),
        }
    }

    /// Returns the next free number for `prefix` in `year`, e.g. `FAC-2026-0003`.
    pub async fn next_invoice_number(&self, prefix: &str, year: i32) -> EngineResult<String> {
        let invoices = self.invoices.load().await?;
        Ok(format_invoice_number(
            prefix,
            year,
            next_sequence(&invoices, prefix, year),
        ))
    }

    /// Prepares the write appending `invoice`, without performing it.
    ///
    /// # Errors
    ///
    /// [`EngineError::Conflict`] when the invoice is not finalized or when
    /// its id or number is already taken.
    pub async fn prepare_insert(&self, invoice: &Invoice) -> EngineResult<(String, String)> {
        if !invoice.is_finalized {
            return Err(EngineError::conflict(format!(
                "invoice {} is not finalized",
                invoice.invoice_number
            )));
        }

        let mut invoices = self.invoices.load().await?;
        if let Some(existing) = invoices
            .iter()
            .find(|i| i.id == invoice.id || i.invoice_number == invoice.invoice_number)
        {
            return Err(EngineError::conflict(format!(
                "invoice {} ({}) already exists and is immutable",
                existing.invoice_number, existing.id
            )));
        }

        invoices.push(invoice.clone());
        self.invoices.encode(&invoices)
    }

    /// Returns one invoice.
    pub async fn get_by_id(&self, id: &InvoiceId) -> EngineResult<Invoice> {
        self.invoices
            .load()
            .await?
            .into_iter()
            .find(|i| &i.id == id)
            .ok_or_else(|| EngineError::not_found("invoice", id.as_str()))
    }

    /// Returns the client's invoices, most recent first.
    pub async fn list_by_client(&self, client_id: &ClientId) -> EngineResult<Vec<Invoice>> {
        let mut invoices: Vec<Invoice> = self
            .invoices
            .load()
            .await?
            .into_iter()
            .filter(|i| &i.client.id == client_id)
            .collect();
        invoices.sort_by(|a, b| {
            b.invoice_date
                .cmp(&a.invoice_date)
                .then_with(|| b.invoice_number.cmp(&a.invoice_number))
        });
        Ok(invoices)
    }
}

fn format_invoice_number(prefix: &str, year: i32, sequence: u32) -> String {
    format!("{}-{}-{:04}", prefix, year, sequence)
}

fn next_sequence(invoices: &[Invoice], prefix: &str, year: i32) -> u32 {
    let stem = format!("{}-{}-", prefix, year);
    invoices
        .iter()
        .filter_map(|i| i.invoice_number.strip_prefix(&stem))
        .filter_map(|seq| seq.parse::<u32>().ok())
        .max()
        .map_or(1, |last| last + 1)
}
