//! Test fixtures for the scheduling-engine integration tests.
//!
//! Builds the engine against the in-memory stores the way an embedder
//! would, through public APIs only.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use planicare_common::{Actor, EventKind, EventPayload, Frequency};
use planicare_config::AppConfig;
use planicare_db::{MemoryStores, WorkerRecord};
use planicare_events::EventService;
use uuid::Uuid;

pub struct Harness {
    pub stores: MemoryStores,
    pub service: EventService,
    pub actor: Actor,
    pub worker: Uuid,
    pub sector: Uuid,
    pub customer: Uuid,
    pub subscription: Uuid,
}

impl Harness {
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
        Harness { stores, service, actor, worker, sector, customer, subscription }
    }

    pub fn intervention(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        frequency: Frequency,
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
            frequency,
        }
    }

    pub fn absence(&self, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> EventPayload {
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

    pub fn internal_hour(
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
}

/// Next Monday at least one week out, at the given UTC hour. Future-dated
/// seeds keep the generator's horizon arithmetic deterministic.
pub fn next_monday_at(hour: u32) -> DateTime<Utc> {
    let mut day = Utc::now().date_naive() + Duration::days(7);
    while day.weekday() != Weekday::Mon {
        day += Duration::days(1);
    }
    Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
}
