//! Shared fixtures for the engine's unit tests.
//!
//! Everything schedules in the future relative to "now" so the generator's
//! horizon arithmetic stays deterministic: for a future-dated seed the range
//! end is exactly `seed + horizon`.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use planicare_common::{
    Actor, Event, EventKind, EventPayload, EventUpdatePayload, Frequency,
};
use planicare_config::AppConfig;
use planicare_db::{MemoryStores, WorkerRecord};
use uuid::Uuid;

use crate::service::EventService;

pub struct TestBed {
    pub stores: MemoryStores,
    pub service: EventService,
    pub actor: Actor,
    pub worker: Uuid,
    pub sector: Uuid,
    pub customer: Uuid,
    pub subscription: Uuid,
}

impl TestBed {
    pub async fn new() -> Self {
        let stores = MemoryStores::new();
        let actor = Actor { id: Uuid::new_v4(), company_id: Uuid::new_v4() };
        let worker = Uuid::new_v4();
        let sector = Uuid::new_v4();
        let customer = Uuid::new_v4();
        let subscription = Uuid::new_v4();
        stores
            .workers
            .register(worker, WorkerRecord::employed(sector).with_customer(customer))
            .await;

        let service = EventService::new(
            stores.events.clone(),
            stores.repetitions.clone(),
            stores.history.clone(),
            stores.workers.clone(),
            stores.customers.clone(),
            &AppConfig::default(),
        );
        TestBed { stores, service, actor, worker, sector, customer, subscription }
    }

    pub fn intervention_payload(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> EventPayload {
        EventPayload {
            kind: EventKind::Intervention {
                customer: self.customer,
                subscription: self.subscription,
            },
            start_date,
            end_date,
            worker: Some(self.worker),
            sector: None,
            misc: None,
            address: None,
            frequency: Frequency::Never,
        }
    }

    pub fn internal_hour_payload(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> EventPayload {
        EventPayload {
            kind: EventKind::InternalHour { kind: "planning".to_string() },
            start_date,
            end_date,
            worker: Some(self.worker),
            sector: None,
            misc: None,
            address: None,
            frequency: Frequency::Never,
        }
    }

    pub fn unavailability_payload(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> EventPayload {
        EventPayload {
            kind: EventKind::Unavailability,
            start_date,
            end_date,
            worker: Some(self.worker),
            sector: None,
            misc: None,
            address: None,
            frequency: Frequency::Never,
        }
    }

    pub fn absence_payload(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> EventPayload {
        EventPayload {
            kind: EventKind::Absence { absence_type: "paid_leave".to_string() },
            start_date,
            end_date,
            worker: Some(self.worker),
            sector: None,
            misc: None,
            address: None,
            frequency: Frequency::Never,
        }
    }
}

/// Update intent that re-states the event as it is.
pub fn identity_update(event: &Event) -> EventUpdatePayload {
    EventUpdatePayload {
        start_date: event.start_date,
        end_date: event.end_date,
        worker: event.worker,
        sector: event.sector,
        subscription: None,
        internal_hour_kind: None,
        misc: event.misc.clone(),
        address: event.address.clone(),
        is_cancelled: event.is_cancelled,
        cancellation: event.cancellation.clone(),
        should_update_repetition: false,
    }
}

/// Next Monday at least one week out, at the given UTC hour.
pub fn next_monday_at(hour: u32) -> DateTime<Utc> {
    let mut day = Utc::now().date_naive() + Duration::days(7);
    while day.weekday() != Weekday::Mon {
        day += Duration::days(1);
    }
    Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
}
