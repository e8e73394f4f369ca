// --- File: crates/planicare_events/src/policy.rs ---
//! Type-specific admission rules.
//!
//! This policy is the single gate the orchestrator calls before any
//! mutation; nothing below it re-validates.

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use planicare_common::{
    Event, EventKind, EventPayload, EventType, EventUpdatePayload, WorkerDirectory,
};
use uuid::Uuid;

use crate::conflicts::{Candidate, ConflictDetector};
use crate::dates;
use crate::error::EventsError;

pub struct ValidationPolicy {
    detector: ConflictDetector,
    workers: Arc<dyn WorkerDirectory>,
    tz: Tz,
}

impl ValidationPolicy {
    pub fn new(detector: ConflictDetector, workers: Arc<dyn WorkerDirectory>, tz: Tz) -> Self {
        Self { detector, workers, tz }
    }

    pub async fn assert_creation_allowed(
        &self,
        company_id: Uuid,
        payload: &EventPayload,
    ) -> Result<(), EventsError> {
        let event_type = payload.kind.event_type();

        if payload.start_date > payload.end_date {
            return Err(EventsError::Validation(
                "start date must not be after end date".to_string(),
            ));
        }
        self.assert_single_day(event_type, payload)?;
        self.assert_assignment_shape(event_type, payload.worker, payload.sector)?;

        if event_type == EventType::Absence && payload.frequency.is_repeating() {
            return Err(EventsError::Validation("absences cannot repeat".to_string()));
        }

        // Direct conflicts surface as errors; a repeating intervention is the
        // one case resolved occurrence-by-occurrence instead (generation
        // detaches or skips, it never aborts).
        let repeated_intervention =
            event_type == EventType::Intervention && payload.frequency.is_repeating();
        if !repeated_intervention {
            let candidate = Candidate::for_creation(company_id, payload);
            if self.detector.has_conflicts(&candidate).await? {
                return Err(EventsError::Conflict(
                    "the worker already has an event on this slot".to_string(),
                ));
            }
        }

        let day = dates::day_of(payload.start_date, self.tz);
        self.assert_contract_coverage(payload.worker, &payload.kind, day).await
    }

    pub async fn assert_update_allowed(
        &self,
        event: &Event,
        payload: &EventUpdatePayload,
    ) -> Result<(), EventsError> {
        let event_type = event.event_type();

        if event.is_billed {
            return Err(EventsError::Forbidden("a billed intervention cannot be edited".to_string()));
        }
        if matches!(event_type, EventType::Absence | EventType::Unavailability)
            && payload.worker != event.worker
        {
            return Err(EventsError::Validation(format!(
                "the worker of an {} cannot be changed",
                if event_type == EventType::Absence { "absence" } else { "unavailability" },
            )));
        }

        if payload.start_date > payload.end_date {
            return Err(EventsError::Validation(
                "start date must not be after end date".to_string(),
            ));
        }
        if event_type != EventType::Absence
            && !dates::same_day(payload.start_date, payload.end_date, self.tz)
        {
            return Err(EventsError::Validation(
                "only absences may span several days".to_string(),
            ));
        }
        if payload.worker.is_some() && payload.sector.is_some() {
            return Err(EventsError::Validation(
                "an event is assigned to a worker or floats at a sector, not both".to_string(),
            ));
        }

        // Series-wide updates resolve conflicts per occurrence; any
        // direct edit must come out clean.
        if !payload.should_update_repetition {
            let candidate = Candidate::for_update(event, payload);
            if self.detector.has_conflicts(&candidate).await? {
                return Err(EventsError::Conflict(
                    "the worker already has an event on this slot".to_string(),
                ));
            }
        }

        let kind = updated_kind(event, payload);
        let day = dates::day_of(payload.start_date, self.tz);
        self.assert_contract_coverage(payload.worker, &kind, day).await
    }

    /// Deletion gate for a whole set: one billed event poisons the batch.
    pub fn assert_deletion_allowed(&self, events: &[Event]) -> Result<(), EventsError> {
        if events.iter().any(|event| event.is_billed) {
            return Err(EventsError::Forbidden(
                "billed interventions cannot be deleted".to_string(),
            ));
        }
        Ok(())
    }

    fn assert_single_day(
        &self,
        event_type: EventType,
        payload: &EventPayload,
    ) -> Result<(), EventsError> {
        if event_type != EventType::Absence
            && !dates::same_day(payload.start_date, payload.end_date, self.tz)
        {
            return Err(EventsError::Validation(
                "only absences may span several days".to_string(),
            ));
        }
        Ok(())
    }

    fn assert_assignment_shape(
        &self,
        event_type: EventType,
        worker: Option<Uuid>,
        sector: Option<Uuid>,
    ) -> Result<(), EventsError> {
        match (worker, sector) {
            (Some(_), Some(_)) => Err(EventsError::Validation(
                "an event is assigned to a worker or floats at a sector, not both".to_string(),
            )),
            (None, None) => Err(EventsError::Validation(
                "an event needs a worker or a sector".to_string(),
            )),
            (None, Some(_))
                if matches!(event_type, EventType::Absence | EventType::Unavailability) =>
            {
                Err(EventsError::Validation(
                    "absences and unavailabilities belong to a worker".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    async fn assert_contract_coverage(
        &self,
        worker: Option<Uuid>,
        kind: &EventKind,
        day: NaiveDate,
    ) -> Result<(), EventsError> {
        let Some(worker) = worker else { return Ok(()) };

        if !self.workers.has_active_contract(worker, day).await? {
            return Err(EventsError::Validation(
                "the worker has no active contract on this day".to_string(),
            ));
        }
        match kind {
            EventKind::Intervention { customer, .. } => {
                if !self.workers.has_customer_contract(worker, *customer, day).await? {
                    return Err(EventsError::Validation(
                        "the worker has no contract with this customer on this day".to_string(),
                    ));
                }
            }
            EventKind::InternalHour { .. } => {
                if !self.workers.has_company_contract(worker, day).await? {
                    return Err(EventsError::Validation(
                        "internal hours require an active company contract".to_string(),
                    ));
                }
            }
            EventKind::Absence { .. } | EventKind::Unavailability => {}
        }
        Ok(())
    }
}

/// The kind the event will have once the payload applies.
fn updated_kind(event: &Event, payload: &EventUpdatePayload) -> EventKind {
    match (&event.kind, payload.subscription, &payload.internal_hour_kind) {
        (EventKind::Intervention { customer, subscription }, changed, _) => {
            EventKind::Intervention {
                customer: *customer,
                subscription: changed.unwrap_or(*subscription),
            }
        }
        (EventKind::InternalHour { kind }, _, changed) => EventKind::InternalHour {
            kind: changed.clone().unwrap_or_else(|| kind.clone()),
        },
        (other, _, _) => other.clone(),
    }
}
