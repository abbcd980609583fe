//! Weekly cost computation.
//!
//! Combines the overtime split with the resolved weekly rate:
//!
//! - normal amount = normal hours × rate
//! - 125% amount = 125% hours × rate × 1.25
//! - 150% amount = 150% hours × rate × 1.50
//!
//! Amounts are rounded to cents; the week total is the sum of the rounded
//! amounts.

use std::collections::BTreeSet;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::OvertimePolicy;
use crate::models::{InvoicePeriod, TimeEntry, WeekWindow, WeeklyCalculation};

use super::{DirectorySnapshot, resolve_weekly_billing_rate, split_overtime};

const AMOUNT_DECIMALS: u32 = 2;

/// Computes one employee's figures for one week.
///
/// Only entries dated inside both `week` and `period` are counted, so
/// boundary weeks are truncated to the invoiced range.
pub fn compute_week(
    week: WeekWindow,
    week_entries: &[TimeEntry],
    period: &InvoicePeriod,
    lookups: &DirectorySnapshot,
    policy: &OvertimePolicy,
) -> WeeklyCalculation {
    let counted: Vec<TimeEntry> = week_entries
        .iter()
        .filter(|e| week.contains_date(e.date) && period.contains_date(e.date))
        .cloned()
        .collect();

    let split = split_overtime(&counted, policy);
    let rate = resolve_weekly_billing_rate(&counted, lookups);
    let average = rate.average_billing_rate;

    let normal_amount = to_cents(split.normal_hours * average);
    let overtime125_amount = to_cents(split.overtime125 * average * policy.tier_125_multiplier);
    let overtime150_amount = to_cents(split.overtime150 * average * policy.tier_150_multiplier);

    let working_days = counted
        .iter()
        .filter(|e| e.total_hours > Decimal::ZERO)
        .map(|e| e.date)
        .collect::<BTreeSet<_>>()
        .len() as u32;

    WeeklyCalculation {
        week,
        total_week_hours: split.total_week_hours,
        normal_hours: split.normal_hours,
        overtime125_hours: split.overtime125,
        overtime150_hours: split.overtime150,
        working_days,
        average_billing_rate: average,
        normal_amount,
        overtime125_amount,
        overtime150_amount,
        total_week_amount: normal_amount + overtime125_amount + overtime150_amount,
        rates: rate.contributions,
    }
}

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}
