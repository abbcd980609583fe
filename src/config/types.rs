//! Configuration types for the invoice engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every structure has a
//! `Default` matching the French staffing defaults.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Weekly overtime policy.
///
/// Hours up to `normal_weekly_hours` are billed at the base rate, hours up to
/// `tier_125_ceiling_hours` at `tier_125_multiplier`, anything beyond at
/// `tier_150_multiplier`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OvertimePolicy {
    /// Weekly hours billed at the normal rate (35).
    pub normal_weekly_hours: Decimal,
    /// Weekly hour count where the first overtime band ends (43).
    pub tier_125_ceiling_hours: Decimal,
    /// Multiplier applied to the first overtime band (1.25).
    pub tier_125_multiplier: Decimal,
    /// Multiplier applied beyond the first band (1.50).
    pub tier_150_multiplier: Decimal,
}

impl Default for OvertimePolicy {
    fn default() -> Self {
        Self {
            normal_weekly_hours: Decimal::new(35, 0),
            tier_125_ceiling_hours: Decimal::new(43, 0),
            tier_125_multiplier: Decimal::new(125, 2),
            tier_150_multiplier: Decimal::new(150, 2),
        }
    }
}

impl OvertimePolicy {
    /// Width of the 1.25x band in hours.
    pub fn tier_125_band_hours(&self) -> Decimal {
        self.tier_125_ceiling_hours - self.normal_weekly_hours
    }
}

/// Invoice-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InvoicingConfig {
    /// ISO 4217 currency code stamped on invoices.
    pub currency: String,
    /// VAT rate applied to the invoice total (0.20 for 20%).
    pub vat_rate: Decimal,
    /// Payment terms used when neither the request nor the client sets one.
    pub default_payment_terms_days: u32,
    /// Prefix of generated invoice numbers.
    pub invoice_number_prefix: String,
    /// Label substituted for employees that can no longer be resolved.
    pub unknown_employee_label: String,
    /// Label substituted for contracts that can no longer be resolved.
    pub unknown_contract_label: String,
    /// Label substituted for clients that can no longer be resolved.
    pub unknown_client_label: String,
}

impl Default for InvoicingConfig {
    fn default() -> Self {
        Self {
            currency: "EUR".to_string(),
            vat_rate: Decimal::new(20, 2),
            default_payment_terms_days: 30,
            invoice_number_prefix: "FAC".to_string(),
            unknown_employee_label: "Unknown employee".to_string(),
            unknown_contract_label: "Unknown contract".to_string(),
            unknown_client_label: "Unknown client".to_string(),
        }
    }
}

/// Validation rules for time entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeEntryRules {
    /// Longest break accepted on a single entry, in minutes.
    pub max_break_minutes: u32,
    /// Most hours a single entry may record for one day.
    pub max_daily_hours: Decimal,
    /// Daily hours recorded as normal on the entry itself; the rest is
    /// recorded as entry-level overtime.
    pub daily_normal_hours: Decimal,
    /// Default weekly hours used when a contract does not specify any.
    pub default_weekly_hours: Decimal,
}

impl Default for TimeEntryRules {
    fn default() -> Self {
        Self {
            max_break_minutes: 480,
            max_daily_hours: Decimal::new(24, 0),
            daily_normal_hours: Decimal::new(7, 0),
            default_weekly_hours: Decimal::new(35, 0),
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    overtime: OvertimePolicy,
    invoicing: InvoicingConfig,
    time_entries: TimeEntryRules,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        overtime: OvertimePolicy,
        invoicing: InvoicingConfig,
        time_entries: TimeEntryRules,
    ) -> Self {
        Self {
            overtime,
            invoicing,
            time_entries,
        }
    }

    /// Returns the weekly overtime policy.
    pub fn overtime(&self) -> &OvertimePolicy {
        &self.overtime
    }

    /// Returns the invoicing settings.
    pub fn invoicing(&self) -> &InvoicingConfig {
        &self.invoicing
    }

    /// Returns the time entry rules.
    pub fn time_entries(&self) -> &TimeEntryRules {
        &self.time_entries
    }
}
