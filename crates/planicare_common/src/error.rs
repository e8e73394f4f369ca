// --- File: crates/planicare_common/src/error.rs ---
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by store and directory collaborators.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with the given id.
    #[error("record not found: {0}")]
    NotFound(Uuid),

    /// The backend rejected or failed the operation.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// Implemented by error types so a transport layer can map engine errors to
/// responses without matching on variants itself.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for StoreError {
    fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound(_) => 404,
            StoreError::Backend(_) => 500,
        }
    }
}
