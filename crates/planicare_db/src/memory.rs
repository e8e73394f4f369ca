// --- File: crates/planicare_db/src/memory.rs ---
//! In-memory implementations of the Planicare collaborator traits.
//!
//! The reference backend: integration tests run the whole engine against
//! it, and embedders without their own persistence can start from it. All
//! state lives behind `tokio::sync::RwLock`ed maps.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use planicare_common::{
    CustomerDirectory, Event, EventHistory, EventPatch, EventQuery, EventStore, HistoryStore,
    RepetitionStore, RepetitionTemplate, StoreError, WorkerDirectory,
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Event persistence backed by a map.
#[derive(Default)]
pub struct MemoryEventStore {
    events: RwLock<HashMap<Uuid, Event>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored, sorted by start date. Test helper.
    pub async fn all(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self.events.read().await.values().cloned().collect();
        events.sort_by_key(|event| event.start_date);
        events
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn find(&self, query: &EventQuery) -> Result<Vec<Event>, StoreError> {
        let events = self.events.read().await;
        let mut matched: Vec<Event> =
            events.values().filter(|event| query.matches(event)).cloned().collect();
        matched.sort_by_key(|event| event.start_date);
        Ok(matched)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn insert_many(&self, new_events: Vec<Event>) -> Result<(), StoreError> {
        let mut events = self.events.write().await;
        for event in new_events {
            events.insert(event.id, event);
        }
        Ok(())
    }

    async fn update_one(&self, id: Uuid, patch: &EventPatch) -> Result<Event, StoreError> {
        let mut events = self.events.write().await;
        let event = events.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply(event);
        Ok(event.clone())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        let mut events = self.events.write().await;
        let mut deleted = 0;
        for id in ids {
            if events.remove(id).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

/// Series template persistence keyed by parent id.
#[derive(Default)]
pub struct MemoryRepetitionStore {
    templates: RwLock<HashMap<Uuid, RepetitionTemplate>>,
}

impl MemoryRepetitionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RepetitionStore for MemoryRepetitionStore {
    async fn find_by_parent_id(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<RepetitionTemplate>, StoreError> {
        Ok(self.templates.read().await.get(&parent_id).cloned())
    }

    async fn upsert(&self, template: RepetitionTemplate) -> Result<(), StoreError> {
        self.templates.write().await.insert(template.parent_id, template);
        Ok(())
    }

    async fn delete_by_parent_id(&self, parent_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.templates.write().await.remove(&parent_id).is_some())
    }
}

/// Append-only audit trail. There is deliberately no mutation or deletion
/// surface beyond `append`.
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: RwLock<Vec<EventHistory>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<EventHistory> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, entry: EventHistory) -> Result<(), StoreError> {
        self.entries.write().await.push(entry);
        Ok(())
    }
}

/// One worker's master data.
#[derive(Debug, Clone, Default)]
pub struct WorkerRecord {
    pub sector: Option<Uuid>,
    /// First day covered by an active contract; `None` means no contract.
    pub contract_from: Option<NaiveDate>,
    /// Customers the worker holds an active contract with.
    pub customers: Vec<Uuid>,
    pub has_company_contract: bool,
}

impl WorkerRecord {
    /// A worker employed since forever, attached to the given sector, with
    /// a company contract. The common fixture shape.
    pub fn employed(sector: Uuid) -> Self {
        WorkerRecord {
            sector: Some(sector),
            contract_from: NaiveDate::from_ymd_opt(2000, 1, 1),
            customers: Vec::new(),
            has_company_contract: true,
        }
    }

    pub fn with_customer(mut self, customer: Uuid) -> Self {
        self.customers.push(customer);
        self
    }
}

/// Worker directory backed by registered records. Unknown workers have no
/// sector and no contracts.
#[derive(Default)]
pub struct MemoryWorkerDirectory {
    records: RwLock<HashMap<Uuid, WorkerRecord>>,
}

impl MemoryWorkerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, worker: Uuid, record: WorkerRecord) {
        self.records.write().await.insert(worker, record);
    }
}

#[async_trait]
impl WorkerDirectory for MemoryWorkerDirectory {
    async fn sector_of(&self, worker: Uuid) -> Result<Option<Uuid>, StoreError> {
        Ok(self.records.read().await.get(&worker).and_then(|record| record.sector))
    }

    async fn has_active_contract(&self, worker: Uuid, day: NaiveDate) -> Result<bool, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .get(&worker)
            .and_then(|record| record.contract_from)
            .is_some_and(|from| day >= from))
    }

    async fn has_customer_contract(
        &self,
        worker: Uuid,
        customer: Uuid,
        day: NaiveDate,
    ) -> Result<bool, StoreError> {
        let records = self.records.read().await;
        let Some(record) = records.get(&worker) else { return Ok(false) };
        Ok(record.contract_from.is_some_and(|from| day >= from)
            && record.customers.contains(&customer))
    }

    async fn has_company_contract(&self, worker: Uuid, day: NaiveDate) -> Result<bool, StoreError> {
        let records = self.records.read().await;
        let Some(record) = records.get(&worker) else { return Ok(false) };
        Ok(record.contract_from.is_some_and(|from| day >= from) && record.has_company_contract)
    }
}

/// Customer directory backed by registered stop dates and absence days.
#[derive(Default)]
pub struct MemoryCustomerDirectory {
    stopped: RwLock<HashMap<Uuid, NaiveDate>>,
    absences: RwLock<HashMap<Uuid, Vec<NaiveDate>>>,
}

impl MemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_stopped(&self, customer: Uuid, day: NaiveDate) {
        self.stopped.write().await.insert(customer, day);
    }

    pub async fn add_absence(&self, customer: Uuid, day: NaiveDate) {
        self.absences.write().await.entry(customer).or_default().push(day);
    }
}

#[async_trait]
impl CustomerDirectory for MemoryCustomerDirectory {
    async fn stopped_at(&self, customer: Uuid) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self.stopped.read().await.get(&customer).copied())
    }

    async fn is_absent_on(&self, customer: Uuid, day: NaiveDate) -> Result<bool, StoreError> {
        Ok(self
            .absences
            .read()
            .await
            .get(&customer)
            .is_some_and(|days| days.contains(&day)))
    }
}

/// Bundles one in-memory backend of everything the engine needs.
#[derive(Default)]
pub struct MemoryStores {
    pub events: Arc<MemoryEventStore>,
    pub repetitions: Arc<MemoryRepetitionStore>,
    pub history: Arc<MemoryHistoryStore>,
    pub workers: Arc<MemoryWorkerDirectory>,
    pub customers: Arc<MemoryCustomerDirectory>,
}

impl MemoryStores {
    pub fn new() -> Self {
        Self::default()
    }
}
