// --- File: crates/planicare_events/src/cascade.rs ---
//! Absence cascade.
//!
//! Creating or updating an absence clears the worker's colliding schedule:
//! internal hours and unavailabilities inside the window are deleted,
//! interventions are handed back to the worker's sector but kept. Both
//! effects reuse the shared deletion and edition paths so they stay
//! audited like any direct mutation.

use planicare_common::{Actor, Event, EventQuery, EventStore, EventType, WorkerDirectory};
use tracing::debug;

use crate::edition;
use crate::error::EventsError;
use crate::service::EventService;

impl EventService {
    pub(crate) async fn apply_absence_cascade(
        &self,
        absence: &Event,
        actor: &Actor,
    ) -> Result<(), EventsError> {
        let Some(worker) = absence.worker else {
            return Ok(());
        };

        let removable = self
            .events
            .find(
                &EventQuery::company(absence.company_id)
                    .for_worker(worker)
                    .of_types([EventType::InternalHour, EventType::Unavailability])
                    .intersecting(absence.start_date, absence.end_date),
            )
            .await?;
        debug!(
            absence = %absence.id,
            removed = removable.len(),
            "absence cascade: clearing internal hours and unavailabilities"
        );
        self.delete_events_and_repetitions(removable, false, actor).await?;

        let interventions = self
            .events
            .find(
                &EventQuery::company(absence.company_id)
                    .for_worker(worker)
                    .of_types([EventType::Intervention])
                    .intersecting(absence.start_date, absence.end_date),
            )
            .await?;
        if interventions.is_empty() {
            return Ok(());
        }

        let sector = self.workers.sector_of(worker).await?;
        for intervention in interventions {
            let payload = edition::unassign_payload(&intervention, sector);
            let detach = edition::should_detach(&intervention, &payload);
            let patch = edition::build_edition_patch(&intervention, &payload, detach);
            let updated = self.events.update_one(intervention.id, &patch).await?;
            self.recorder.record_update(&intervention, &updated, actor).await?;
        }
        Ok(())
    }
}
