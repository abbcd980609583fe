//! Invoice snapshot models.
//!
//! An [`Invoice`] is frozen at creation: every figure, name and weekly
//! breakdown it displays is embedded, so it never has to be recomputed from
//! live time entries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    AggregateTotals, Client, ClientId, EmployeeAggregate, InvoiceId, InvoicePeriod, TimeEntryId,
    WorkPeriod,
};

/// Client fields copied onto the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSnapshot {
    /// The client identifier.
    pub id: ClientId,
    /// Company name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Postal code.
    pub postal_code: String,
    /// City.
    pub city: String,
    /// Company registration number.
    pub siret: Option<String>,
    /// Billing contact email.
    pub email: Option<String>,
    /// True when the client could not be resolved.
    #[serde(default)]
    pub is_placeholder: bool,
}

impl ClientSnapshot {
    /// Copies the billing fields of a resolved client.
    pub fn from_client(client: &Client) -> Self {
        Self {
            id: client.id.clone(),
            name: client.name.clone(),
            address: client.address.clone(),
            postal_code: client.postal_code.clone(),
            city: client.city.clone(),
            siret: client.siret.clone(),
            email: client.email.clone(),
            is_placeholder: false,
        }
    }

    /// Builds a clearly marked stand-in for a client that no longer resolves.
    pub fn placeholder(id: ClientId, label: &str) -> Self {
        Self {
            id,
            name: label.to_string(),
            address: String::new(),
            postal_code: String::new(),
            city: String::new(),
            siret: None,
            email: None,
            is_placeholder: true,
        }
    }
}

/// A selected work period with the names it is displayed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicedWorkPeriod {
    /// The work period as selected by the preparer.
    pub work_period: WorkPeriod,
    /// Employee display name.
    pub employee_name: String,
    /// Contract title.
    pub contract_title: String,
    /// Contract location.
    pub contract_location: String,
    /// True when the employee or contract could not be resolved.
    #[serde(default)]
    pub is_placeholder: bool,
}

/// Fields chosen by the preparer when finalizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFields {
    /// Issue date.
    pub invoice_date: NaiveDate,
    /// Payment due date; derived from payment terms when absent.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Free-form notes printed on the invoice.
    #[serde(default)]
    pub notes: String,
}

/// A finalized, immutable invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Human-facing number, e.g. `FAC-2026-0001`.
    pub invoice_number: String,
    /// Billed client, denormalized.
    pub client: ClientSnapshot,
    /// Billed range.
    pub period: InvoicePeriod,
    /// Issue date.
    pub invoice_date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// ISO 4217 currency.
    pub currency: String,
    /// The work periods selected for billing.
    pub work_periods: Vec<InvoicedWorkPeriod>,
    /// Sum of every employee's totals (amounts excluding VAT).
    pub global_totals: AggregateTotals,
    /// Per-employee weekly detail.
    pub employees_data: Vec<EmployeeAggregate>,
    /// VAT rate applied.
    pub vat_rate: Decimal,
    /// VAT amount, rounded to cents.
    pub vat_amount: Decimal,
    /// Total including VAT, rounded to cents.
    pub total_including_vat: Decimal,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Time entries frozen into this invoice.
    pub time_entry_ids: Vec<TimeEntryId>,
    /// Always true for a persisted snapshot.
    pub is_finalized: bool,
    /// When the snapshot was taken.
    pub finalized_at: DateTime<Utc>,
}
