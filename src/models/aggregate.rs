//! Aggregation result models.
//!
//! This module contains the derived figures produced by the weekly
//! computation: [`WeeklyCalculation`] per employee and week,
//! [`AggregateTotals`] and the per-employee [`EmployeeAggregate`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ContractId, EmployeeId, WeekKey, WeekWindow};

/// Where the billing rate of a contribution was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// The rate stored on the time entry itself.
    TimeEntry,
    /// The contract's billing rate.
    ContractBillingRate,
    /// The contract's pay rate, used as a last resort.
    ContractHourlyRate,
    /// Nothing was found; the hours are billed at zero.
    Unresolved,
}

/// Hours billed at one rate under one contract within a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateContribution {
    /// The contract the hours were worked under.
    pub contract_id: ContractId,
    /// Hours contributed at this rate.
    pub hours: Decimal,
    /// The resolved billing rate.
    pub rate: Decimal,
    /// Where the rate came from.
    pub source: RateSource,
}

/// Hours and amounts for one employee over one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCalculation {
    /// The week computed.
    pub week: WeekWindow,
    /// All hours counted in the week.
    pub total_week_hours: Decimal,
    /// Hours billed at the base rate.
    pub normal_hours: Decimal,
    /// Hours billed at 1.25x.
    pub overtime125_hours: Decimal,
    /// Hours billed at 1.50x.
    pub overtime150_hours: Decimal,
    /// Distinct days with hours recorded.
    pub working_days: u32,
    /// Hours-weighted average billing rate.
    pub average_billing_rate: Decimal,
    /// `normal_hours × rate`.
    pub normal_amount: Decimal,
    /// `overtime125_hours × rate × 1.25`.
    pub overtime125_amount: Decimal,
    /// `overtime150_hours × rate × 1.50`.
    pub overtime150_amount: Decimal,
    /// Sum of the three amounts.
    pub total_week_amount: Decimal,
    /// The rates that went into the average.
    pub rates: Vec<RateContribution>,
}

/// Field-wise sums of weekly figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTotals {
    /// All hours.
    pub total_hours: Decimal,
    /// Hours at the base rate.
    pub normal_hours: Decimal,
    /// Hours at 1.25x.
    pub overtime125_hours: Decimal,
    /// Hours at 1.50x.
    pub overtime150_hours: Decimal,
    /// Days with hours recorded.
    pub working_days: u32,
    /// Amount billed at the base rate.
    pub normal_amount: Decimal,
    /// Amount billed at 1.25x.
    pub overtime125_amount: Decimal,
    /// Amount billed at 1.50x.
    pub overtime150_amount: Decimal,
    /// Everything billed.
    pub total_amount: Decimal,
}

impl AggregateTotals {
    /// Adds one week's figures.
    pub fn add_week(&mut self, week: &WeeklyCalculation) {
        self.total_hours += week.total_week_hours;
        self.normal_hours += week.normal_hours;
        self.overtime125_hours += week.overtime125_hours;
        self.overtime150_hours += week.overtime150_hours;
        self.working_days += week.working_days;
        self.normal_amount += week.normal_amount;
        self.overtime125_amount += week.overtime125_amount;
        self.overtime150_amount += week.overtime150_amount;
        self.total_amount += week.total_week_amount;
    }

    /// Adds another set of totals.
    pub fn add(&mut self, other: &AggregateTotals) {
        self.total_hours += other.total_hours;
        self.normal_hours += other.normal_hours;
        self.overtime125_hours += other.overtime125_hours;
        self.overtime150_hours += other.overtime150_hours;
        self.working_days += other.working_days;
        self.normal_amount += other.normal_amount;
        self.overtime125_amount += other.overtime125_amount;
        self.overtime150_amount += other.overtime150_amount;
        self.total_amount += other.total_amount;
    }
}

impl<'a> std::iter::Sum<&'a AggregateTotals> for AggregateTotals {
    fn sum<I: Iterator<Item = &'a AggregateTotals>>(iter: I) -> Self {
        iter.fold(AggregateTotals::default(), |mut acc, totals| {
            acc.add(totals);
            acc
        })
    }
}

/// Identity of an aggregated employee as shown on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRef {
    /// The employee identifier.
    pub id: EmployeeId,
    /// Display name at the time of aggregation.
    pub name: String,
    /// Job title at the time of aggregation.
    #[serde(default)]
    pub position: String,
    /// True when the employee could not be resolved and `name` is a placeholder.
    #[serde(default)]
    pub is_placeholder: bool,
}

/// One employee's weekly breakdown and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeAggregate {
    /// Who the figures belong to.
    pub employee: EmployeeRef,
    /// Non-empty weeks, in chronological order.
    pub weeks: BTreeMap<WeekKey, WeeklyCalculation>,
    /// Sum of every week.
    pub totals: AggregateTotals,
}

/// Aggregates keyed by employee.
pub type EmployeeAggregateMap = BTreeMap<EmployeeId, EmployeeAggregate>;
