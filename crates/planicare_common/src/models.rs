// --- File: crates/planicare_common/src/models.rs ---
//! Persisted domain model shared by every Planicare crate.
//!
//! Field names and enum values are the stable wire contract: records written
//! by an earlier deployment must deserialize unchanged, so everything here
//! serializes camelCase with SCREAMING_SNAKE_CASE enum values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Intervention,
    InternalHour,
    Absence,
    Unavailability,
}

/// Recurrence frequencies. `Never` marks an event that is not part of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    #[default]
    Never,
    EveryDay,
    EveryWeekDay,
    EveryWeek,
    EveryTwoWeeks,
}

impl Frequency {
    /// Calendar-day step between two occurrences, `None` for `Never`.
    pub fn step_days(&self) -> Option<i64> {
        match self {
            Frequency::Never => None,
            Frequency::EveryDay | Frequency::EveryWeekDay => Some(1),
            Frequency::EveryWeek => Some(7),
            Frequency::EveryTwoWeeks => Some(14),
        }
    }

    /// Whether occurrences are restricted to Monday through Friday.
    pub fn week_days_only(&self) -> bool {
        matches!(self, Frequency::EveryWeekDay)
    }

    pub fn is_repeating(&self) -> bool {
        !matches!(self, Frequency::Never)
    }
}

/// Type-specific payload of an event.
///
/// The tag doubles as the persisted `type` field; validation and the edition
/// builder switch exhaustively over it, so a type can never carry fields that
/// belong to another one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    #[serde(rename_all = "camelCase")]
    Intervention { customer: Uuid, subscription: Uuid },
    #[serde(rename_all = "camelCase")]
    InternalHour { kind: String },
    #[serde(rename_all = "camelCase")]
    Absence { absence_type: String },
    Unavailability,
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Intervention { .. } => EventType::Intervention,
            EventKind::InternalHour { .. } => EventType::InternalHour,
            EventKind::Absence { .. } => EventType::Absence,
            EventKind::Unavailability => EventType::Unavailability,
        }
    }

    pub fn customer(&self) -> Option<Uuid> {
        match self {
            EventKind::Intervention { customer, .. } => Some(*customer),
            _ => None,
        }
    }

    pub fn subscription(&self) -> Option<Uuid> {
        match self {
            EventKind::Intervention { subscription, .. } => Some(*subscription),
            _ => None,
        }
    }
}

/// Series membership of an event.
///
/// `parent_id` is the id of the originating occurrence; the first occurrence
/// of a series is its own parent. A detached occurrence keeps its parent id
/// but drops back to `Never` so propagation no longer touches it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repetition {
    pub frequency: Frequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
}

impl Repetition {
    pub fn none() -> Self {
        Repetition { frequency: Frequency::Never, parent_id: None }
    }

    /// A repetition that can drive series-wide operations.
    pub fn is_valid(&self) -> bool {
        self.frequency.is_repeating() && self.parent_id.is_some()
    }
}

impl Default for Repetition {
    fn default() -> Self {
        Repetition::none()
    }
}

/// Cancellation terms attached to a cancelled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cancellation {
    pub condition: String,
    pub reason: String,
}

/// A scheduled occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub company_id: Uuid,
    #[serde(flatten)]
    pub kind: EventKind,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Assigned worker; exclusive with `sector`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<Uuid>,
    /// Owning sector when the event floats unassigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation: Option<Cancellation>,
    /// Only meaningful for interventions; freezes the event once set.
    #[serde(default)]
    pub is_billed: bool,
    #[serde(default)]
    pub repetition: Repetition,
}

impl Event {
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    pub fn is_intervention(&self) -> bool {
        matches!(self.kind, EventKind::Intervention { .. })
    }

    pub fn is_absence(&self) -> bool {
        matches!(self.kind, EventKind::Absence { .. })
    }
}

/// One row per active series, keyed by `parent_id`.
///
/// Carries the schedulable fields of the seed occurrence; it is the source of
/// truth when projecting new occurrences and when propagating edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepetitionTemplate {
    pub parent_id: Uuid,
    pub company_id: Uuid,
    #[serde(flatten)]
    pub kind: EventKind,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub frequency: Frequency,
}

// --- Audit trail ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryAction {
    Creation,
    Update,
    Deletion,
}

/// Before/after pair for one audited field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange<T> {
    pub from: T,
    pub to: T,
}

/// Diff object of a history entry. Each field is one independent diff; the
/// recorder writes one entry per populated diff, never a merged one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<FieldChange<Option<Uuid>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<FieldChange<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<FieldChange<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_hour: Option<FieldChange<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_hour: Option<FieldChange<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel: Option<Cancellation>,
}

impl HistoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.auxiliary.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.start_hour.is_none()
            && self.end_hour.is_none()
            && self.cancel.is_none()
    }
}

/// Snapshot of the event a history entry talks about.
///
/// References by id only, so the trail survives event deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub event_id: Uuid,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absence_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_hour_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition: Option<Repetition>,
}

impl EventSnapshot {
    pub fn of(event: &Event) -> Self {
        let (absence_type, internal_hour_kind) = match &event.kind {
            EventKind::Absence { absence_type } => (Some(absence_type.clone()), None),
            EventKind::InternalHour { kind } => (None, Some(kind.clone())),
            _ => (None, None),
        };
        EventSnapshot {
            event_id: event.id,
            event_type: event.event_type(),
            start_date: event.start_date,
            end_date: event.end_date,
            customer: event.kind.customer(),
            worker: event.worker,
            misc: event.misc.clone(),
            absence_type,
            internal_hour_kind,
            repetition: event.repetition.is_valid().then_some(event.repetition),
        }
    }
}

/// Immutable append-only audit entry. Never mutated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHistory {
    pub id: Uuid,
    pub company_id: Uuid,
    pub created_by: Uuid,
    pub action: HistoryAction,
    pub event: EventSnapshot,
    #[serde(default, skip_serializing_if = "HistoryUpdate::is_empty")]
    pub update: HistoryUpdate,
    /// Denormalized for fast filtering.
    #[serde(default)]
    pub sectors: Vec<Uuid>,
    #[serde(default)]
    pub auxiliaries: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Authenticated caller, supplied by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub id: Uuid,
    pub company_id: Uuid,
}

// --- Mutation intents ---

/// Creation intent, already type-checked by the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(flatten)]
    pub kind: EventKind,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
}

/// Update intent for one occurrence, or for a whole series when
/// `should_update_repetition` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdatePayload {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_hour_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation: Option<Cancellation>,
    #[serde(default)]
    pub should_update_repetition: bool,
}

// --- Partial update ---

/// One patch cell: leave the field alone, set it, or clear it.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Keep,
    Set(T),
    Unset,
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T: Clone> Patch<T> {
    pub fn apply_to(&self, slot: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Set(value) => *slot = Some(value.clone()),
            Patch::Unset => *slot = None,
        }
    }
}

/// Field-level update of one event, with explicit set/unset semantics so a
/// store can translate it to its native partial-update operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub worker: Patch<Uuid>,
    pub sector: Patch<Uuid>,
    /// Only applies to interventions.
    pub subscription: Option<Uuid>,
    /// Only applies to internal hours.
    pub internal_hour_kind: Option<String>,
    pub misc: Patch<String>,
    pub address: Patch<String>,
    /// `Set` cancels the event, `Unset` clears an existing cancellation.
    pub cancellation: Patch<Cancellation>,
    /// Replaces the series membership wholesale; a detach writes
    /// `{ frequency: Never, parent_id: <unchanged> }`.
    pub repetition: Option<Repetition>,
}

impl EventPatch {
    pub fn apply(&self, event: &mut Event) {
        if let Some(start) = self.start_date {
            event.start_date = start;
        }
        if let Some(end) = self.end_date {
            event.end_date = end;
        }
        self.worker.apply_to(&mut event.worker);
        self.sector.apply_to(&mut event.sector);
        if let Some(subscription) = self.subscription {
            if let EventKind::Intervention { subscription: current, .. } = &mut event.kind {
                *current = subscription;
            }
        }
        if let Some(kind) = &self.internal_hour_kind {
            if let EventKind::InternalHour { kind: current } = &mut event.kind {
                *current = kind.clone();
            }
        }
        self.misc.apply_to(&mut event.misc);
        self.address.apply_to(&mut event.address);
        match &self.cancellation {
            Patch::Keep => {}
            Patch::Set(cancellation) => {
                event.is_cancelled = true;
                event.cancellation = Some(cancellation.clone());
            }
            Patch::Unset => {
                event.is_cancelled = false;
                event.cancellation = None;
            }
        }
        if let Some(repetition) = self.repetition {
            event.repetition = repetition;
        }
    }
}
