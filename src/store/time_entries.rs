//! Time entry store.
//!
//! Owns the `time_entries` collection and is the only code that mutates time
//! entries. It enforces input validation, one entry per (employee, contract,
//! date), and the `draft -> validated -> invoiced` lifecycle.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::TimeEntryRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    InvoicePeriod, TimeEntry, TimeEntryId, TimeEntryInput, TimeEntryStatus, split_daily_hours,
};

use super::KeyValueStore;
use super::collection::{JsonCollection, TIME_ENTRIES_KEY};

/// Durable collection of time entries.
#[derive(Clone)]
pub struct TimeEntryStore {
    entries: JsonCollection<TimeEntry>,
    clock: Arc<dyn Clock>,
    rules: TimeEntryRules,
}

impl TimeEntryStore {
    /// Binds the store to the `time_entries` key of `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, rules: TimeEntryRules) -> Self {
        Self {
            entries: JsonCollection::new(store, TIME_ENTRIES_KEY),
            clock,
            rules,
        }
    }

    /// Records a new draft entry.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] for malformed input,
    /// [`EngineError::Conflict`] when the (employee, contract, date) slot is taken.
    pub async fn create(&self, input: TimeEntryInput) -> EngineResult<TimeEntry> {
        let total_hours = input.validate(self.clock.today(), &self.rules)?;
        let mut all = self.entries.load().await?;

        ensure_slot_free(&all, &input, None)?;

        let now = self.clock.now();
        let (normal_hours, overtime_hours) = split_daily_hours(total_hours, &self.rules);
        let entry = TimeEntry {
            id: TimeEntryId::new(Uuid::new_v4().to_string()),
            employee_id: input.employee_id,
            contract_id: input.contract_id,
            client_id: input.client_id,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            break_minutes: input.break_minutes,
            total_hours,
            normal_hours,
            overtime_hours,
            hourly_rate: input.hourly_rate,
            billing_rate: input.billing_rate,
            status: TimeEntryStatus::Draft,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };

        all.push(entry.clone());
        self.entries.save(&all).await?;

        info!(
            time_entry_id = %entry.id,
            employee_id = %entry.employee_id,
            date = %entry.date,
            hours = %entry.total_hours,
            "Time entry created"
        );
        Ok(entry)
    }

    /// Replaces the editable fields of an entry, keeping its status.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] for an unknown id, [`EngineError::Conflict`]
    /// when the entry is invoiced or the new slot is taken,
    /// [`EngineError::Validation`] for malformed input.
    pub async fn update(&self, id: &TimeEntryId, input: TimeEntryInput) -> EngineResult<TimeEntry> {
        let mut all = self.entries.load().await?;
        let position = find_position(&all, id)?;
        ensure_editable(&all[position])?;

        let total_hours = input.validate(self.clock.today(), &self.rules)?;
        ensure_slot_free(&all, &input, Some(id))?;

        let (normal_hours, overtime_hours) = split_daily_hours(total_hours, &self.rules);
        let entry = &mut all[position];
        entry.employee_id = input.employee_id;
        entry.contract_id = input.contract_id;
        entry.client_id = input.client_id;
        entry.date = input.date;
        entry.start_time = input.start_time;
        entry.end_time = input.end_time;
        entry.break_minutes = input.break_minutes;
        entry.total_hours = total_hours;
        entry.normal_hours = normal_hours;
        entry.overtime_hours = overtime_hours;
        entry.hourly_rate = input.hourly_rate;
        entry.billing_rate = input.billing_rate;
        entry.notes = input.notes;
        entry.updated_at = self.clock.now();
        let updated = entry.clone();

        self.entries.save(&all).await?;
        info!(time_entry_id = %id, "Time entry updated");
        Ok(updated)
    }

    /// Moves a draft entry to `validated`.
    pub async fn validate(&self, id: &TimeEntryId) -> EngineResult<TimeEntry> {
        let mut all = self.entries.load().await?;
        let position = find_position(&all, id)?;

        let entry = &mut all[position];
        if entry.status != TimeEntryStatus::Draft {
            return Err(EngineError::conflict(format!(
                "time entry {} is {}, only draft entries can be validated",
                id, entry.status
            )));
        }
        entry.status = TimeEntryStatus::Validated;
        entry.updated_at = self.clock.now();
        let validated = entry.clone();

        self.entries.save(&all).await?;
        info!(time_entry_id = %id, "Time entry validated");
        Ok(validated)
    }

    /// Deletes an entry that has not been invoiced.
    pub async fn delete(&self, id: &TimeEntryId) -> EngineResult<()> {
        let mut all = self.entries.load().await?;
        let position = find_position(&all, id)?;
        ensure_editable(&all[position])?;

        all.remove(position);
        self.entries.save(&all).await?;
        info!(time_entry_id = %id, "Time entry deleted");
        Ok(())
    }

    /// Returns one entry.
    pub async fn get_by_id(&self, id: &TimeEntryId) -> EngineResult<TimeEntry> {
        self.entries
            .load()
            .await?
            .into_iter()
            .find(|e| &e.id == id)
            .ok_or_else(|| EngineError::not_found("time entry", id.as_str()))
    }

    /// Returns every entry dated within `period`, ordered by date.
    pub async fn list_in_period(&self, period: &InvoicePeriod) -> EngineResult<Vec<TimeEntry>> {
        let mut entries: Vec<TimeEntry> = self
            .entries
            .load()
            .await?
            .into_iter()
            .filter(|e| period.contains_date(e.date))
            .collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }

    /// Prepares the write that marks `ids` as invoiced, without performing it.
    ///
    /// Every id must exist and be `validated`; otherwise nothing is prepared.
    /// The returned pair is meant for a batched [`KeyValueStore::set_many`].
    pub async fn prepare_invoiced(&self, ids: &[TimeEntryId]) -> EngineResult<(String, String)> {
        let wanted: HashSet<&TimeEntryId> = ids.iter().collect();
        let mut all = self.entries.load().await?;
        let now = self.clock.now();

        let mut marked = 0usize;
        for entry in all.iter_mut().filter(|e| wanted.contains(&e.id)) {
            if entry.status != TimeEntryStatus::Validated {
                return Err(EngineError::conflict(format!(
                    "time entry {} is {}, only validated entries can be invoiced",
                    entry.id, entry.status
                )));
            }
            entry.status = TimeEntryStatus::Invoiced;
            entry.updated_at = now;
            marked += 1;
        }

        if marked != wanted.len() {
            let missing = ids
                .iter()
                .find(|id| !all.iter().any(|e| &e.id == *id))
                .map(|id| id.to_string())
                .unwrap_or_default();
            warn!(missing = %missing, "Invoiced time entry vanished before finalization");
            return Err(EngineError::not_found("time entry", missing));
        }

        self.entries.encode(&all)
    }
}

fn find_position(entries: &[TimeEntry], id: &TimeEntryId) -> EngineResult<usize> {
    entries
        .iter()
        .position(|e| &e.id == id)
        .ok_or_else(|| EngineError::not_found("time entry", id.as_str()))
}

fn ensure_editable(entry: &TimeEntry) -> EngineResult<()> {
    if entry.status.is_editable() {
        Ok(())
    } else {
        Err(EngineError::conflict(format!(
            "time entry {} is invoiced and can no longer change",
            entry.id
        )))
    }
}

fn ensure_slot_free(
    entries: &[TimeEntry],
    input: &TimeEntryInput,
    except: Option<&TimeEntryId>,
) -> EngineResult<()> {
    let taken = entries
        .iter()
        .filter(|e| Some(&e.id) != except)
        .any(|e| e.same_slot(&input.employee_id, &input.contract_id, input.date));
    if taken {
        return Err(EngineError::conflict(format!(
            "a time entry already exists for employee {} on contract {} at {}",
            input.employee_id, input.contract_id, input.date
        )));
    }
    Ok(())
}
