// --- File: crates/planicare_common/src/services.rs ---
//! Collaborator abstractions the scheduling engine is constructed with.
//!
//! These traits decouple the engine from any concrete persistence or people
//! directory. `planicare_db` ships in-memory implementations; an embedder
//! with its own store implements the same traits.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Event, EventHistory, EventPatch, EventType, RepetitionTemplate};

/// Predicate for event lookups.
///
/// Every populated field narrows the result; the default matches all
/// non-cancelled events. `matches` is the reference semantics any backend
/// must reproduce.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub company_id: Option<Uuid>,
    pub worker: Option<Uuid>,
    pub customer: Option<Uuid>,
    pub types: Option<Vec<EventType>>,
    /// Half-open interval `[start, end)` the event must intersect.
    pub intersects: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub starts_on_or_after: Option<DateTime<Utc>>,
    pub parent_id: Option<Uuid>,
    pub exclude_id: Option<Uuid>,
    pub include_cancelled: bool,
}

impl EventQuery {
    pub fn company(company_id: Uuid) -> Self {
        EventQuery { company_id: Some(company_id), ..Default::default() }
    }

    pub fn for_worker(mut self, worker: Uuid) -> Self {
        self.worker = Some(worker);
        self
    }

    pub fn for_customer(mut self, customer: Uuid) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn of_types(mut self, types: impl Into<Vec<EventType>>) -> Self {
        self.types = Some(types.into());
        self
    }

    pub fn intersecting(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.intersects = Some((start, end));
        self
    }

    pub fn starting_at_or_after(mut self, start: DateTime<Utc>) -> Self {
        self.starts_on_or_after = Some(start);
        self
    }

    pub fn in_series(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn excluding(mut self, id: Uuid) -> Self {
        self.exclude_id = Some(id);
        self
    }

    pub fn with_cancelled(mut self) -> Self {
        self.include_cancelled = true;
        self
    }

    /// Reference matching semantics.
    pub fn matches(&self, event: &Event) -> bool {
        if !self.include_cancelled && event.is_cancelled {
            return false;
        }
        if let Some(company_id) = self.company_id {
            if event.company_id != company_id {
                return false;
            }
        }
        if let Some(worker) = self.worker {
            if event.worker != Some(worker) {
                return false;
            }
        }
        if let Some(customer) = self.customer {
            if event.kind.customer() != Some(customer) {
                return false;
            }
        }
        if let Some(types) = &self.types {
            if !types.contains(&event.event_type()) {
                return false;
            }
        }
        if let Some((start, end)) = self.intersects {
            // Half-open intervals: touching boundaries do not intersect.
            if !(event.start_date < end && event.end_date > start) {
                return false;
            }
        }
        if let Some(start) = self.starts_on_or_after {
            if event.start_date < start {
                return false;
            }
        }
        if let Some(parent_id) = self.parent_id {
            if event.repetition.parent_id != Some(parent_id) {
                return false;
            }
        }
        if let Some(excluded) = self.exclude_id {
            if event.id == excluded {
                return false;
            }
        }
        true
    }
}

/// Persistence of events.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn find(&self, query: &EventQuery) -> Result<Vec<Event>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError>;

    async fn insert_many(&self, events: Vec<Event>) -> Result<(), StoreError>;

    /// Applies a field-level patch and returns the updated event.
    async fn update_one(&self, id: Uuid, patch: &EventPatch) -> Result<Event, StoreError>;

    /// Hard-deletes and returns the number of removed events.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError>;
}

/// Persistence of series templates, keyed by the series parent id.
#[async_trait]
pub trait RepetitionStore: Send + Sync {
    async fn find_by_parent_id(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<RepetitionTemplate>, StoreError>;

    async fn upsert(&self, template: RepetitionTemplate) -> Result<(), StoreError>;

    async fn delete_by_parent_id(&self, parent_id: Uuid) -> Result<bool, StoreError>;
}

/// Append-only audit trail persistence.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, entry: EventHistory) -> Result<(), StoreError>;
}

/// Worker master data: sector membership and contract coverage.
#[async_trait]
pub trait WorkerDirectory: Send + Sync {
    async fn sector_of(&self, worker: Uuid) -> Result<Option<Uuid>, StoreError>;

    /// Any active contract covering the given day.
    async fn has_active_contract(&self, worker: Uuid, day: NaiveDate) -> Result<bool, StoreError>;

    /// Active worker-customer contract covering the given day.
    async fn has_customer_contract(
        &self,
        worker: Uuid,
        customer: Uuid,
        day: NaiveDate,
    ) -> Result<bool, StoreError>;

    /// Active company contract covering the given day.
    async fn has_company_contract(&self, worker: Uuid, day: NaiveDate) -> Result<bool, StoreError>;
}

/// Customer master data consulted during series generation.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Day from which the customer no longer receives interventions.
    async fn stopped_at(&self, customer: Uuid) -> Result<Option<NaiveDate>, StoreError>;

    /// Whether the customer is individually absent on the given day.
    async fn is_absent_on(&self, customer: Uuid, day: NaiveDate) -> Result<bool, StoreError>;
}
