// --- File: crates/planicare_events/src/error.rs ---
use planicare_common::{HttpStatusCode, StoreError};
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the scheduling engine.
///
/// Conflicts discovered while generating or propagating a series are not
/// errors: they are resolved by policy (detach or drop the occurrence) and
/// never abort the operation. Only direct create/update conflicts surface
/// as [`EventsError::Conflict`].
#[derive(Error, Debug)]
pub enum EventsError {
    /// Malformed or disallowed mutation shape. Raised before any write.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Overlapping schedule on a direct create/update.
    #[error("scheduling conflict: {0}")]
    Conflict(String),

    /// Attempt to mutate or delete a billed event. No partial action taken.
    #[error("operation forbidden: {0}")]
    Forbidden(String),

    #[error("event not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HttpStatusCode for EventsError {
    fn status_code(&self) -> u16 {
        match self {
            EventsError::Validation(_) => 422,
            EventsError::Conflict(_) => 409,
            EventsError::Forbidden(_) => 403,
            EventsError::NotFound(_) => 404,
            EventsError::Store(inner) => inner.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_their_transport_status() {
        assert_eq!(EventsError::Validation("x".into()).status_code(), 422);
        assert_eq!(EventsError::Conflict("x".into()).status_code(), 409);
        assert_eq!(EventsError::Forbidden("x".into()).status_code(), 403);
        assert_eq!(EventsError::NotFound(Uuid::new_v4()).status_code(), 404);
        assert_eq!(EventsError::Store(StoreError::Backend("x".into())).status_code(), 500);
    }
}
