//! Request types for the invoice engine API.
//!
//! Time entry endpoints accept [`TimeEntryInput`](crate::models::TimeEntryInput)
//! as is; the invoice endpoints use the bodies below.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{ClientId, InvoiceFields, InvoicePeriod, WorkPeriod};
use crate::service::InvoiceRequest;

/// Request body for `POST /invoices/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewInvoiceRequest {
    /// The billed client.
    pub client_id: ClientId,
    /// First billed day (inclusive).
    pub period_start: NaiveDate,
    /// Last billed day (inclusive).
    pub period_end: NaiveDate,
    /// Work periods as ticked in the UI; all of the client's when omitted.
    #[serde(default)]
    pub work_periods: Option<Vec<WorkPeriod>>,
}

impl PreviewInvoiceRequest {
    /// Checks the period and converts to the service request.
    pub fn into_invoice_request(self) -> EngineResult<InvoiceRequest> {
        Ok(InvoiceRequest {
            client_id: self.client_id,
            period: InvoicePeriod::new(self.period_start, self.period_end)?,
            work_periods: self.work_periods,
        })
    }
}

/// Request body for `POST /invoices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    /// What to invoice.
    #[serde(flatten)]
    pub invoice: PreviewInvoiceRequest,
    /// Issue date.
    pub invoice_date: NaiveDate,
    /// Payment due date; derived from payment terms when omitted.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl CreateInvoiceRequest {
    /// Splits the body into the service request and the invoice fields.
    pub fn into_parts(self) -> EngineResult<(InvoiceRequest, InvoiceFields)> {
        let fields = InvoiceFields {
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            notes: self.notes,
        };
        Ok((self.invoice.into_invoice_request()?, fields))
    }
}
