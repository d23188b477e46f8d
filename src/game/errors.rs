use thiserror::Error;

/// Errors that can arise while interacting with the game storage layer.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, seed file reads).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// Malformed create payload; the request is rejected with no state change.
    #[error("invalid payload: {0}")]
    Validation(String),

    /// A uniqueness or guarded-transition rule was violated (duplicate start,
    /// re-completion, deciding a non-pending application).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A structural invariant is broken, e.g. a user exists without a
    /// progress record. Always logged; never silently skipped.
    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    /// Internal error (lock poisoning, unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<crate::validation::PayloadError> for GameError {
    fn from(err: crate::validation::PayloadError) -> Self {
        GameError::Validation(err.to_string())
    }
}
