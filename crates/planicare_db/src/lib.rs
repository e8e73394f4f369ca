// --- File: crates/planicare_db/src/lib.rs ---

// Declare modules within this crate
pub mod memory;

pub use memory::{
    MemoryCustomerDirectory, MemoryEventStore, MemoryHistoryStore, MemoryRepetitionStore,
    MemoryStores, MemoryWorkerDirectory, WorkerRecord,
};
