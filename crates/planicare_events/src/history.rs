// --- File: crates/planicare_events/src/history.rs ---
//! Audit trail recorder.
//!
//! Derives field-level diffs from the before/after state of a mutation and
//! appends one immutable history entry per independent diff. One user-facing
//! mutation can therefore legitimately produce several entries.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use planicare_common::{
    Actor, Event, EventHistory, EventSnapshot, FieldChange, HistoryAction, HistoryStore,
    HistoryUpdate, WorkerDirectory,
};
use uuid::Uuid;

use crate::dates;
use crate::error::EventsError;

pub struct HistoryRecorder {
    history: Arc<dyn HistoryStore>,
    workers: Arc<dyn WorkerDirectory>,
    tz: Tz,
}

impl HistoryRecorder {
    pub fn new(history: Arc<dyn HistoryStore>, workers: Arc<dyn WorkerDirectory>, tz: Tz) -> Self {
        Self { history, workers, tz }
    }

    /// One CREATION entry, reflecting the resolved repetition of the seed.
    pub async fn record_creation(&self, event: &Event, actor: &Actor) -> Result<(), EventsError> {
        let entry = self.base_entry(event, HistoryAction::Creation, actor).await?;
        self.history.append(entry).await?;
        Ok(())
    }

    /// One DELETION entry for the event — or, for a deleted series range,
    /// for the first event standing in for the whole group.
    pub async fn record_deletion(&self, event: &Event, actor: &Actor) -> Result<(), EventsError> {
        let entry = self.base_entry(event, HistoryAction::Deletion, actor).await?;
        self.history.append(entry).await?;
        Ok(())
    }

    /// One UPDATE entry per applicable diff: worker reassignment, calendar
    /// day move, time-of-day move (same day), cancellation-state change.
    /// An edit matching none of them (a misc-only note change) still gets a
    /// bare entry so every successful update leaves a trace.
    pub async fn record_update(
        &self,
        before: &Event,
        after: &Event,
        actor: &Actor,
    ) -> Result<(), EventsError> {
        let mut entries: Vec<EventHistory> = Vec::new();

        if before.worker != after.worker {
            let mut entry = self.base_entry(after, HistoryAction::Update, actor).await?;
            entry.update.auxiliary =
                Some(FieldChange { from: before.worker, to: after.worker });
            entry.auxiliaries = dedup([before.worker, after.worker]);
            // Zero, one or two sectors, depending on whether a worker was
            // added, removed or swapped.
            let mut sectors = Vec::new();
            for worker in [before.worker, after.worker].into_iter().flatten() {
                if let Some(sector) = self.workers.sector_of(worker).await? {
                    sectors.push(sector);
                }
            }
            entry.sectors = dedup(sectors.into_iter().map(Some));
            entries.push(entry);
        }

        if !dates::same_day(before.start_date, after.start_date, self.tz) {
            let mut entry = self.base_entry(after, HistoryAction::Update, actor).await?;
            entry.update.start_date =
                Some(FieldChange { from: before.start_date, to: after.start_date });
            if !dates::same_day(after.start_date, after.end_date, self.tz) {
                entry.update.end_date =
                    Some(FieldChange { from: before.end_date, to: after.end_date });
            }
            entries.push(entry);
        } else if before.start_date != after.start_date || before.end_date != after.end_date {
            let mut entry = self.base_entry(after, HistoryAction::Update, actor).await?;
            if before.start_date != after.start_date {
                entry.update.start_hour =
                    Some(FieldChange { from: before.start_date, to: after.start_date });
            }
            if before.end_date != after.end_date {
                entry.update.end_hour =
                    Some(FieldChange { from: before.end_date, to: after.end_date });
            }
            entries.push(entry);
        }

        if before.is_cancelled != after.is_cancelled {
            let mut entry = self.base_entry(after, HistoryAction::Update, actor).await?;
            // Cancelling records the new terms; reverting records the terms
            // being removed.
            entry.update.cancel = after.cancellation.clone().or_else(|| before.cancellation.clone());
            entries.push(entry);
        }

        if entries.is_empty() {
            entries.push(self.base_entry(after, HistoryAction::Update, actor).await?);
        }
        for entry in entries {
            self.history.append(entry).await?;
        }
        Ok(())
    }

    async fn base_entry(
        &self,
        event: &Event,
        action: HistoryAction,
        actor: &Actor,
    ) -> Result<EventHistory, EventsError> {
        let sector = match event.sector {
            Some(sector) => Some(sector),
            None => match event.worker {
                Some(worker) => self.workers.sector_of(worker).await?,
                None => None,
            },
        };
        Ok(EventHistory {
            id: Uuid::new_v4(),
            company_id: actor.company_id,
            created_by: actor.id,
            action,
            event: EventSnapshot::of(event),
            update: HistoryUpdate::default(),
            sectors: sector.into_iter().collect(),
            auxiliaries: event.worker.into_iter().collect(),
            created_at: Utc::now(),
        })
    }
}

fn dedup(values: impl IntoIterator<Item = Option<Uuid>>) -> Vec<Uuid> {
    let mut seen = Vec::new();
    for value in values.into_iter().flatten() {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
