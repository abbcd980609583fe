//! Work period generation and billable entry selection.
//!
//! Work periods are the candidate blocks a preparer ticks before finalizing.
//! Their estimates assume five equal working days a week and are only shown
//! for guidance; billed figures come from the weekly aggregation.

use chrono::{Datelike, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::TimeEntryRules;
use crate::models::{Contract, InvoicePeriod, TimeEntry, WorkPeriod};

const WORKING_DAYS_PER_WEEK: u32 = 5;

/// Intersects every contract with the invoice period.
///
/// Contracts that do not overlap the period are skipped. Every generated
/// period starts selected.
pub fn generate_work_periods(
    contracts: &[Contract],
    period: &InvoicePeriod,
    rules: &TimeEntryRules,
) -> Vec<WorkPeriod> {
    let mut work_periods: Vec<WorkPeriod> = contracts
        .iter()
        .filter_map(|contract| {
            let overlap = period.intersect(contract.start_date, contract.end_date)?;
            Some(estimate(contract, &overlap, rules))
        })
        .collect();

    work_periods.sort_by(|a, b| {
        a.employee_id
            .cmp(&b.employee_id)
            .then_with(|| a.start_date.cmp(&b.start_date))
            .then_with(|| a.contract_id.cmp(&b.contract_id))
    });
    work_periods
}

fn estimate(contract: &Contract, overlap: &InvoicePeriod, rules: &TimeEntryRules) -> WorkPeriod {
    let estimated_working_days = overlap
        .days()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32;

    let weekly_hours = contract
        .working_hours
        .filter(|h| *h > Decimal::ZERO)
        .unwrap_or(rules.default_weekly_hours);
    let estimated_hours = (weekly_hours * Decimal::from(estimated_working_days)
        / Decimal::from(WORKING_DAYS_PER_WEEK))
    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let billing_rate = contract
        .billing_rate
        .filter(|r| !r.is_zero())
        .or(contract.hourly_rate.filter(|r| !r.is_zero()))
        .unwrap_or(Decimal::ZERO);

    WorkPeriod {
        employee_id: contract.employee_id.clone(),
        contract_id: contract.id.clone(),
        start_date: overlap.start_date,
        end_date: overlap.end_date,
        estimated_working_days,
        estimated_hours,
        billing_rate,
        estimated_amount: (estimated_hours * billing_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        selected: true,
    }
}

/// Keeps the entries an invoice over `period` bills.
///
/// An entry is billed when it is validated, dated inside the period, and
/// covered by a selected work period.
pub fn select_entries(
    entries: &[TimeEntry],
    work_periods: &[WorkPeriod],
    period: &InvoicePeriod,
) -> Vec<TimeEntry> {
    entries
        .iter()
        .filter(|e| e.is_billable() && period.contains_date(e.date))
        .filter(|e| work_periods.iter().any(|wp| wp.selected && wp.covers(e)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeEntryStatus;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn january() -> InvoicePeriod {
        InvoicePeriod::new(make_date(2026, 1, 1), make_date(2026, 1, 31)).unwrap()
    }

    fn create_contract(id: &str, employee: &str, start: NaiveDate, end: Option<NaiveDate>) -> Contract {
        Contract {
            id: id.into(),
            employee_id: employee.into(),
            client_id: "cli_001".into(),
            title: "Picker".to_string(),
            location: "Lyon".to_string(),
            start_date: start,
            end_date: end,
            billing_rate: Some(dec("20")),
            hourly_rate: Some(dec("14")),
            working_hours: None,
        }
    }

    fn create_entry(contract: &str, day: u32, status: TimeEntryStatus) -> TimeEntry {
        let at = Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap();
        TimeEntry {
            id: format!("te_{}_{}", contract, day).into(),
            employee_id: "emp_001".into(),
            contract_id: contract.into(),
            client_id: "cli_001".into(),
            date: make_date(2026, 1, day),
            start_time: None,
            end_time: None,
            break_minutes: 0,
            total_hours: dec("7"),
            normal_hours: dec("7"),
            overtime_hours: Decimal::ZERO,
            hourly_rate: None,
            billing_rate: None,
            status,
            notes: String::new(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_open_contract_covers_whole_period() {
        let contracts = vec![create_contract("ctr_1", "emp_001", make_date(2025, 6, 1), None)];
        let periods = generate_work_periods(&contracts, &january(), &TimeEntryRules::default());

        assert_eq!(periods.len(), 1);
        let wp = &periods[0];
        assert_eq!(wp.start_date, make_date(2026, 1, 1));
        assert_eq!(wp.end_date, make_date(2026, 1, 31));
        // January 2026 has 22 weekdays.
        assert_eq!(wp.estimated_working_days, 22);
        assert_eq!(wp.estimated_hours, dec("154"));
        assert_eq!(wp.estimated_amount, dec("3080"));
        assert!(wp.selected);
    }

    #[test]
    fn test_contract_clipped_and_non_overlapping_skipped() {
        let contracts = vec![
            create_contract("ctr_1", "emp_001", make_date(2026, 1, 12), Some(make_date(2026, 1, 16))),
            create_contract("ctr_2", "emp_002", make_date(2026, 3, 1), None),
        ];
        let periods = generate_work_periods(&contracts, &january(), &TimeEntryRules::default());

        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].estimated_working_days, 5);
        assert_eq!(periods[0].estimated_hours, dec("35"));
    }

    #[test]
    fn test_contract_weekly_hours_drive_estimate() {
        let mut contract =
            create_contract("ctr_1", "emp_001", make_date(2026, 1, 12), Some(make_date(2026, 1, 18)));
        contract.working_hours = Some(dec("24"));
        contract.billing_rate = None;
        let periods = generate_work_periods(&[contract], &january(), &TimeEntryRules::default());

        assert_eq!(periods[0].estimated_hours, dec("24"));
        assert_eq!(periods[0].billing_rate, dec("14"));
    }

    #[test]
    fn test_select_only_validated_entries_of_selected_periods() {
        let contracts = vec![
            create_contract("ctr_1", "emp_001", make_date(2026, 1, 1), None),
            create_contract("ctr_2", "emp_001", make_date(2026, 1, 1), None),
        ];
        let mut periods = generate_work_periods(&contracts, &january(), &TimeEntryRules::default());
        periods
            .iter_mut()
            .filter(|wp| wp.contract_id.as_str() == "ctr_2")
            .for_each(|wp| wp.selected = false);

        let entries = vec![
            create_entry("ctr_1", 12, TimeEntryStatus::Validated),
            create_entry("ctr_1", 13, TimeEntryStatus::Draft),
            create_entry("ctr_1", 14, TimeEntryStatus::Invoiced),
            create_entry("ctr_2", 12, TimeEntryStatus::Validated),
        ];
        let selected = select_entries(&entries, &periods, &january());

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id.as_str(), "te_ctr_1_12");
    }
}
