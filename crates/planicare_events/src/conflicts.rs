// --- File: crates/planicare_events/src/conflicts.rs ---
//! Schedule conflict detection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use planicare_common::{Event, EventPayload, EventQuery, EventStore, EventType, EventUpdatePayload};
use uuid::Uuid;

use crate::error::EventsError;

/// The hypothetical slot a conflict check runs against.
///
/// Built from an event, a creation payload, or an event-plus-edit so update
/// paths can probe the schedule before writing anything.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub company_id: Uuid,
    pub worker: Option<Uuid>,
    pub event_type: EventType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Excluded from the search so an edit never conflicts with itself.
    pub exclude_id: Option<Uuid>,
}

impl Candidate {
    pub fn for_creation(company_id: Uuid, payload: &EventPayload) -> Self {
        Candidate {
            company_id,
            worker: payload.worker,
            event_type: payload.kind.event_type(),
            start_date: payload.start_date,
            end_date: payload.end_date,
            exclude_id: None,
        }
    }

    pub fn for_update(event: &Event, payload: &EventUpdatePayload) -> Self {
        Candidate {
            company_id: event.company_id,
            worker: payload.worker,
            event_type: event.event_type(),
            start_date: payload.start_date,
            end_date: payload.end_date,
            exclude_id: Some(event.id),
        }
    }
}

/// Read-only detector of overlapping schedules for one worker.
pub struct ConflictDetector {
    events: Arc<dyn EventStore>,
}

impl ConflictDetector {
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self { events }
    }

    /// True when another non-cancelled event of the same worker intersects
    /// the candidate's `[start, end)` window.
    ///
    /// Absence candidates are only checked against other absences: a
    /// non-absence overlap is legitimate there because the absence cascade
    /// clears it separately.
    pub async fn has_conflicts(&self, candidate: &Candidate) -> Result<bool, EventsError> {
        let Some(worker) = candidate.worker else {
            // Unassigned events float at a sector and cannot collide.
            return Ok(false);
        };

        let mut query = EventQuery::company(candidate.company_id)
            .for_worker(worker)
            .intersecting(candidate.start_date, candidate.end_date);
        if candidate.event_type == EventType::Absence {
            query = query.of_types([EventType::Absence]);
        }
        if let Some(excluded) = candidate.exclude_id {
            query = query.excluding(excluded);
        }

        let overlapping = self.events.find(&query).await?;
        Ok(!overlapping.is_empty())
    }
}
