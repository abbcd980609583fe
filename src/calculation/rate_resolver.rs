//! Weekly billing rate resolution.
//!
//! Each entry's rate is looked up in this order:
//!
//! 1. the billing rate stored on the entry
//! 2. the contract's billing rate
//! 3. the contract's hourly (pay) rate
//!
//! A rate of zero counts as missing. When nothing resolves, the entry bills
//! at zero but its hours still weigh in the average.
//!
//! The week's rate is the hours-weighted average
//! `Σ(hours × rate) / Σ(hours)`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EngineError;
use crate::models::{Contract, RateContribution, RateSource, TimeEntry};

use super::DirectorySnapshot;

/// The week's average billing rate and what it was made of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRate {
    /// Hours-weighted average; zero when the week has no hours.
    pub average_billing_rate: Decimal,
    /// Hours grouped by contract, rate and source, in first-seen order.
    pub contributions: Vec<RateContribution>,
}

/// Resolves the hours-weighted billing rate of one employee-week.
///
/// # Example
///
/// ```
/// use invoice_engine::calculation::{DirectorySnapshot, resolve_weekly_billing_rate};
///
/// let rate = resolve_weekly_billing_rate(&[], &DirectorySnapshot::default());
/// assert!(rate.average_billing_rate.is_zero());
/// ```
pub fn resolve_weekly_billing_rate(
    week_entries: &[TimeEntry],
    lookups: &DirectorySnapshot,
) -> WeeklyRate {
    let mut contributions: Vec<RateContribution> = Vec::new();
    let mut total_hours = Decimal::ZERO;
    let mut weighted = Decimal::ZERO;

    for entry in week_entries {
        let (rate, source) = match resolve_entry_rate(entry, lookups.contract(&entry.contract_id)) {
            Ok(resolved) => resolved,
            Err(error) => {
                warn!(
                    time_entry_id = %entry.id,
                    contract_id = %entry.contract_id,
                    error = %error,
                    "No billing rate, billing at zero"
                );
                (Decimal::ZERO, RateSource::Unresolved)
            }
        };

        total_hours += entry.total_hours;
        weighted += entry.total_hours * rate;

        match contributions
            .iter_mut()
            .find(|c| c.contract_id == entry.contract_id && c.rate == rate && c.source == source)
        {
            Some(existing) => existing.hours += entry.total_hours,
            None => contributions.push(RateContribution {
                contract_id: entry.contract_id.clone(),
                hours: entry.total_hours,
                rate,
                source,
            }),
        }
    }

    let average_billing_rate = if total_hours.is_zero() {
        Decimal::ZERO
    } else {
        (weighted / total_hours).normalize()
    };

    WeeklyRate {
        average_billing_rate,
        contributions,
    }
}

/// Applies the fallback chain to one entry.
fn resolve_entry_rate(
    entry: &TimeEntry,
    contract: Option<&Contract>,
) -> Result<(Decimal, RateSource), EngineError> {
    if let Some(rate) = present(entry.billing_rate) {
        return Ok((rate, RateSource::TimeEntry));
    }
    if let Some(contract) = contract {
        if let Some(rate) = present(contract.billing_rate) {
            return Ok((rate, RateSource::ContractBillingRate));
        }
        if let Some(rate) = present(contract.hourly_rate) {
            return Ok((rate, RateSource::ContractHourlyRate));
        }
    }
    Err(EngineError::Resolution {
        contract_id: entry.contract_id.to_string(),
    })
}

fn present(rate: Option<Decimal>) -> Option<Decimal> {
    rate.filter(|r| !r.is_zero())
}
