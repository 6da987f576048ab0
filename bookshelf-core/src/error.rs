//! Error types for Bookshelf Core

use thiserror::Error;

/// Result type alias using ShelfError
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Top-level error type for all Bookshelf operations
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ShelfError {
    /// Whether this error means the edited record no longer exists
    pub fn is_stale(&self) -> bool {
        matches!(self, ShelfError::Store(StoreError::StaleReference { .. }))
    }
}

/// Errors raised when user input does not satisfy a field constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),

    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    #[error("{later} is before {earlier}")]
    DateOrder {
        earlier: &'static str,
        later: &'static str,
    },
}

/// Errors that occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} no longer exists")]
    StaleReference { kind: &'static str, id: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Unsupported library version {found} (newest known is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn stale(kind: &'static str, id: impl ToString) -> Self {
        StoreError::StaleReference {
            kind,
            id: id.to_string(),
        }
    }
}
