// --- File: crates/planicare_events/src/service.rs ---
//! Mutation orchestrator: the public entry points of the engine.
//!
//! Sequencing per operation: admission policy first (nothing is written when
//! it refuses), then the repetition engine for recurring intents, then the
//! absence cascade, then the audit trail. The steps are not wrapped in a
//! transaction; write order is chosen so a crash mid-sequence degrades
//! safely (history before hard deletes, occurrences before the template).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use planicare_common::{
    Actor, CustomerDirectory, Event, EventPayload, EventQuery, EventStore, EventUpdatePayload,
    HistoryStore, Repetition, RepetitionStore, WorkerDirectory,
};
use planicare_config::AppConfig;
use tracing::{debug, info};
use uuid::Uuid;

use crate::conflicts::ConflictDetector;
use crate::edition;
use crate::error::EventsError;
use crate::history::HistoryRecorder;
use crate::policy::ValidationPolicy;
use crate::repetition::RepetitionEngine;

/// The scheduling engine. Construct once with the collaborator
/// implementations; every method is request-scoped and run-to-completion.
pub struct EventService {
    pub(crate) events: Arc<dyn EventStore>,
    pub(crate) repetitions: Arc<dyn RepetitionStore>,
    pub(crate) workers: Arc<dyn WorkerDirectory>,
    pub(crate) policy: ValidationPolicy,
    pub(crate) recorder: HistoryRecorder,
    pub(crate) repetition: RepetitionEngine,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventStore>,
        repetitions: Arc<dyn RepetitionStore>,
        history: Arc<dyn HistoryStore>,
        workers: Arc<dyn WorkerDirectory>,
        customers: Arc<dyn CustomerDirectory>,
        config: &AppConfig,
    ) -> Self {
        let tz = config.scheduling.tz();
        let policy = ValidationPolicy::new(
            ConflictDetector::new(events.clone()),
            workers.clone(),
            tz,
        );
        let recorder = HistoryRecorder::new(history, workers.clone(), tz);
        let repetition = RepetitionEngine::new(
            events.clone(),
            repetitions.clone(),
            workers.clone(),
            customers,
            ConflictDetector::new(events.clone()),
            config.scheduling.horizon_days,
            tz,
        );
        Self { events, repetitions, workers, policy, recorder, repetition }
    }

    /// Creates one event, generating its series when the payload repeats.
    pub async fn create_event(
        &self,
        payload: EventPayload,
        actor: &Actor,
    ) -> Result<Event, EventsError> {
        self.policy.assert_creation_allowed(actor.company_id, &payload).await?;

        let id = Uuid::new_v4();
        let repetition = if payload.frequency.is_repeating() {
            // The first occurrence of a series is its own parent.
            Repetition { frequency: payload.frequency, parent_id: Some(id) }
        } else {
            Repetition::none()
        };
        let event = Event {
            id,
            company_id: actor.company_id,
            kind: payload.kind,
            start_date: payload.start_date,
            end_date: payload.end_date,
            worker: payload.worker,
            sector: payload.sector,
            misc: payload.misc,
            address: payload.address,
            is_cancelled: false,
            cancellation: None,
            is_billed: false,
            repetition,
        };
        self.events.insert_many(vec![event.clone()]).await?;

        let event = if event.repetition.frequency.is_repeating() {
            self.repetition.create_repetitions(&event).await?
        } else {
            event
        };

        self.recorder.record_creation(&event, actor).await?;
        if event.is_absence() {
            self.apply_absence_cascade(&event, actor).await?;
        }
        info!(event = %event.id, kind = ?event.event_type(), "event created");
        Ok(event)
    }

    /// Updates one occurrence, or a whole series when the payload carries
    /// `should_update_repetition`.
    pub async fn update_event(
        &self,
        id: Uuid,
        payload: EventUpdatePayload,
        actor: &Actor,
    ) -> Result<Event, EventsError> {
        let before = self.events.get(id).await?.ok_or(EventsError::NotFound(id))?;
        self.policy.assert_update_allowed(&before, &payload).await?;

        let after = if payload.should_update_repetition {
            if !before.repetition.is_valid() {
                return Err(EventsError::Validation(
                    "the event does not belong to a repetition".to_string(),
                ));
            }
            self.repetition.update_repetition(&before, &payload).await?
        } else {
            let detach = edition::should_detach(&before, &payload);
            let patch = edition::build_edition_patch(&before, &payload, detach);
            self.events.update_one(id, &patch).await?
        };

        self.recorder.record_update(&before, &after, actor).await?;
        if after.is_absence() {
            self.apply_absence_cascade(&after, actor).await?;
        }
        Ok(after)
    }

    /// Deletes one occurrence.
    pub async fn delete_event(&self, id: Uuid, actor: &Actor) -> Result<(), EventsError> {
        let event = self.events.get(id).await?.ok_or(EventsError::NotFound(id))?;
        self.delete_events_and_repetitions(vec![event], false, actor).await
    }

    /// Deletes a series from the given occurrence onward, template included.
    pub async fn delete_repetition(&self, id: Uuid, actor: &Actor) -> Result<(), EventsError> {
        let seed = self.events.get(id).await?.ok_or(EventsError::NotFound(id))?;
        let Some(parent_id) = seed.repetition.parent_id.filter(|_| seed.repetition.is_valid())
        else {
            return Err(EventsError::Validation(
                "the event does not belong to a repetition".to_string(),
            ));
        };
        if seed.is_absence() {
            return Err(EventsError::Validation(
                "absences cannot be deleted as a series".to_string(),
            ));
        }

        let occurrences = self
            .events
            .find(
                &EventQuery::company(seed.company_id)
                    .in_series(parent_id)
                    .starting_at_or_after(seed.start_date)
                    .with_cancelled(),
            )
            .await?;
        self.delete_events_and_repetitions(occurrences, true, actor).await
    }

    /// Deletes every event of a customer intersecting `[from, to)`,
    /// series-aware: one audit entry per deleted series range.
    pub async fn delete_events_in_range(
        &self,
        customer: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        actor: &Actor,
    ) -> Result<(), EventsError> {
        let events = self
            .events
            .find(
                &EventQuery::company(actor.company_id)
                    .for_customer(customer)
                    .intersecting(from, to)
                    .with_cancelled(),
            )
            .await?;
        self.delete_events_and_repetitions(events, true, actor).await
    }

    /// Read-side convenience for transport layers.
    pub async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>, EventsError> {
        let mut events = self.events.find(query).await?;
        events.sort_by_key(|event| event.start_date);
        Ok(events)
    }

    /// Shared bulk deletion path.
    ///
    /// A billed event anywhere in the set aborts the whole operation before
    /// any write. History entries are appended before the hard delete: an
    /// orphan audit line beats an unaudited deletion if the sequence dies
    /// in between.
    pub(crate) async fn delete_events_and_repetitions(
        &self,
        events: Vec<Event>,
        also_delete_repetitions: bool,
        actor: &Actor,
    ) -> Result<(), EventsError> {
        if events.is_empty() {
            return Ok(());
        }
        self.policy.assert_deletion_allowed(&events)?;

        if !also_delete_repetitions {
            for event in &events {
                self.recorder.record_deletion(event, actor).await?;
            }
        } else {
            let mut groups: HashMap<Option<Uuid>, Vec<&Event>> = HashMap::new();
            for event in &events {
                groups.entry(event.repetition.parent_id).or_default().push(event);
            }
            for (parent_id, group) in groups {
                match parent_id {
                    None => {
                        for event in group {
                            self.recorder.record_deletion(event, actor).await?;
                        }
                    }
                    Some(parent_id) => {
                        // One entry stands in for the whole deleted range.
                        if let Some(first) =
                            group.iter().min_by_key(|event| event.start_date)
                        {
                            self.recorder.record_deletion(first, actor).await?;
                        }
                        self.repetitions.delete_by_parent_id(parent_id).await?;
                    }
                }
            }
        }

        let ids: Vec<Uuid> = events.iter().map(|event| event.id).collect();
        let deleted = self.events.delete_many(&ids).await?;
        debug!(deleted, "events removed");
        Ok(())
    }
}
