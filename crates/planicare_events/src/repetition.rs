// --- File: crates/planicare_events/src/repetition.rs ---
//! Series generation and propagation.
//!
//! Conflicts met here are resolved by policy instead of surfacing:
//! interventions are detached (kept, unassigned, out of the series),
//! internal hours and unavailabilities are skipped or deleted. Generation
//! is bounded by the configured forecast horizon, so one run is always
//! O(horizon / step).

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use planicare_common::{
    CustomerDirectory, Event, EventKind, EventPatch, EventQuery, EventStore, EventUpdatePayload,
    Frequency, Patch, Repetition, RepetitionStore, RepetitionTemplate, WorkerDirectory,
};
use tracing::debug;
use uuid::Uuid;

use crate::conflicts::{Candidate, ConflictDetector};
use crate::dates;
use crate::edition;
use crate::error::EventsError;

pub struct RepetitionEngine {
    events: Arc<dyn EventStore>,
    repetitions: Arc<dyn RepetitionStore>,
    workers: Arc<dyn WorkerDirectory>,
    customers: Arc<dyn CustomerDirectory>,
    detector: ConflictDetector,
    horizon: Duration,
    tz: Tz,
}

impl RepetitionEngine {
    pub fn new(
        events: Arc<dyn EventStore>,
        repetitions: Arc<dyn RepetitionStore>,
        workers: Arc<dyn WorkerDirectory>,
        customers: Arc<dyn CustomerDirectory>,
        detector: ConflictDetector,
        horizon_days: i64,
        tz: Tz,
    ) -> Self {
        Self {
            events,
            repetitions,
            workers,
            customers,
            detector,
            horizon: Duration::days(horizon_days),
            tz,
        }
    }

    /// Projects a seed event into its future occurrences.
    ///
    /// Re-running the same seed later extends the range: the horizon is
    /// relative to "now", so the effect is idempotent but the window is not.
    pub async fn create_repetitions(&self, seed: &Event) -> Result<Event, EventsError> {
        let Some(step) = seed.repetition.frequency.step_days() else {
            return Ok(seed.clone());
        };

        // The seed becomes the head of the series it spawns, even when it
        // was itself generated from an older one.
        let seed = if seed.repetition.parent_id != Some(seed.id) {
            let patch = EventPatch {
                repetition: Some(Repetition {
                    frequency: seed.repetition.frequency,
                    parent_id: Some(seed.id),
                }),
                ..Default::default()
            };
            self.events.update_one(seed.id, &patch).await?
        } else {
            seed.clone()
        };

        let sector = self.fallback_sector(seed.sector, seed.worker).await?;

        let now = Utc::now();
        let range_end = seed.start_date.max(now) + self.horizon;
        let seed_day = dates::day_of(seed.start_date, self.tz);
        let days = dates::occurrence_days(
            seed_day,
            dates::day_of(range_end, self.tz),
            step,
            seed.repetition.frequency.week_days_only(),
        );
        debug!(
            seed = %seed.id,
            frequency = ?seed.repetition.frequency,
            occurrences = days.len(),
            "projecting series"
        );

        let mut occurrences = Vec::new();
        for day in days {
            let start_date = dates::on_day(seed.start_date, day, self.tz);
            let end_date = dates::on_day(seed.end_date, day, self.tz);

            if let EventKind::Intervention { customer, .. } = &seed.kind {
                if let Some(stopped) = self.customers.stopped_at(*customer).await? {
                    if day > stopped {
                        // The series ends at the customer's stop date.
                        break;
                    }
                }
                if self.customers.is_absent_on(*customer, day).await? {
                    continue;
                }
            }

            let conflicting = self
                .detector
                .has_conflicts(&Candidate {
                    company_id: seed.company_id,
                    worker: seed.worker,
                    event_type: seed.event_type(),
                    start_date,
                    end_date,
                    exclude_id: None,
                })
                .await?;

            let occurrence = match (&seed.kind, conflicting) {
                (_, false) => occurrence_of(&seed, start_date, end_date, seed.worker, seed.sector),
                (EventKind::Intervention { .. }, true) => {
                    // Created anyway, but unassigned and out of the series.
                    let mut detached =
                        occurrence_of(&seed, start_date, end_date, None, sector);
                    detached.repetition.frequency = Frequency::Never;
                    detached
                }
                (_, true) => continue,
            };
            occurrences.push(occurrence);
        }

        self.events.insert_many(occurrences).await?;
        self.repetitions
            .upsert(RepetitionTemplate {
                parent_id: seed.id,
                company_id: seed.company_id,
                kind: seed.kind.clone(),
                start_date: seed.start_date,
                end_date: seed.end_date,
                worker: seed.worker,
                sector,
                misc: seed.misc.clone(),
                address: seed.address.clone(),
                frequency: seed.repetition.frequency,
            })
            .await?;
        Ok(seed)
    }

    /// Applies an edit to the template and every future attached occurrence
    /// of the series. Returns the updated seed occurrence.
    pub async fn update_repetition(
        &self,
        seed: &Event,
        payload: &EventUpdatePayload,
    ) -> Result<Event, EventsError> {
        let Some(parent_id) = seed.repetition.parent_id else {
            return Err(EventsError::Validation(
                "the event does not belong to a repetition".to_string(),
            ));
        };

        let occurrences: Vec<Event> = self
            .events
            .find(
                &EventQuery::company(seed.company_id)
                    .in_series(parent_id)
                    .starting_at_or_after(seed.start_date),
            )
            .await?
            .into_iter()
            // Detached occurrences stopped following the series.
            .filter(|occurrence| occurrence.repetition.frequency.is_repeating())
            .collect();

        let fallback = self.fallback_sector(payload.sector, payload.worker).await?;
        let mut updated_seed = seed.clone();

        for occurrence in occurrences {
            let day = dates::day_of(occurrence.start_date, self.tz);
            // The payload's time-of-day lands on each occurrence's own day.
            let start_date = dates::on_day(payload.start_date, day, self.tz);
            let end_date = dates::on_day(payload.end_date, day, self.tz);

            if let EventKind::Intervention { customer, .. } = &occurrence.kind {
                if self.customers.is_absent_on(*customer, day).await? {
                    continue;
                }
            }

            let conflicting = self
                .detector
                .has_conflicts(&Candidate {
                    company_id: occurrence.company_id,
                    worker: payload.worker,
                    event_type: occurrence.event_type(),
                    start_date,
                    end_date,
                    exclude_id: Some(occurrence.id),
                })
                .await?;

            if conflicting && !seed.is_intervention() {
                // Non-intervention series drop the colliding occurrence.
                self.events.delete_many(&[occurrence.id]).await?;
                continue;
            }

            let mut occurrence_payload = payload.clone();
            occurrence_payload.start_date = start_date;
            occurrence_payload.end_date = end_date;
            let mut patch = edition::build_edition_patch(&occurrence, &occurrence_payload, false);
            if conflicting {
                // Detach this occurrence alone; the rest of the series is
                // unaffected.
                patch.worker = Patch::Unset;
                patch.sector = fallback.map(Patch::Set).unwrap_or(Patch::Keep);
                patch.repetition = Some(Repetition {
                    frequency: Frequency::Never,
                    parent_id: Some(parent_id),
                });
            }

            let updated = self.events.update_one(occurrence.id, &patch).await?;
            if updated.id == seed.id {
                updated_seed = updated;
            }
        }

        self.repetitions
            .upsert(template_of(&updated_seed, payload, parent_id))
            .await?;
        Ok(updated_seed)
    }

    async fn fallback_sector(
        &self,
        sector: Option<Uuid>,
        worker: Option<Uuid>,
    ) -> Result<Option<Uuid>, EventsError> {
        if sector.is_some() {
            return Ok(sector);
        }
        match worker {
            Some(worker) => Ok(self.workers.sector_of(worker).await?),
            None => Ok(None),
        }
    }
}

fn occurrence_of(
    seed: &Event,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    worker: Option<Uuid>,
    sector: Option<Uuid>,
) -> Event {
    Event {
        id: Uuid::new_v4(),
        company_id: seed.company_id,
        kind: seed.kind.clone(),
        start_date,
        end_date,
        worker,
        sector,
        misc: seed.misc.clone(),
        address: seed.address.clone(),
        is_cancelled: false,
        cancellation: None,
        is_billed: false,
        repetition: Repetition {
            frequency: seed.repetition.frequency,
            parent_id: seed.repetition.parent_id,
        },
    }
}

fn template_of(seed: &Event, payload: &EventUpdatePayload, parent_id: Uuid) -> RepetitionTemplate {
    let kind = match (&seed.kind, payload.subscription, &payload.internal_hour_kind) {
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
    };
    RepetitionTemplate {
        parent_id,
        company_id: seed.company_id,
        kind,
        start_date: payload.start_date,
        end_date: payload.end_date,
        worker: payload.worker,
        sector: payload.sector,
        misc: payload.misc.clone(),
        address: payload.address.clone(),
        frequency: seed.repetition.frequency,
    }
}
