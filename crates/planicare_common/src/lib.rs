// --- File: crates/planicare_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Store error and status-code mapping
pub mod logging; // Logging utilities
pub mod models; // Persisted domain model
#[cfg(test)]
mod models_test;
pub mod services; // Collaborator trait abstractions
#[cfg(test)]
mod services_test;

// Re-export the types virtually every dependent crate needs
pub use error::{HttpStatusCode, StoreError};
pub use models::{
    Actor, Cancellation, Event, EventHistory, EventKind, EventPatch, EventPayload, EventSnapshot,
    EventType, EventUpdatePayload, FieldChange, Frequency, HistoryAction, HistoryUpdate, Patch,
    Repetition, RepetitionTemplate,
};
pub use services::{
    CustomerDirectory, EventQuery, EventStore, HistoryStore, RepetitionStore, WorkerDirectory,
};
