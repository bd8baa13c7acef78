use shared::ValidationError;

use crate::storage::StorageError;

/// Failures of booking operations, one variant per HTTP outcome.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("time slot already booked")]
    Conflict { conflicting_id: Option<String> },
    #[error("a booking with id `{0}` already exists")]
    DuplicateId(String),
    #[error("booking `{0}` not found")]
    NotFound(String),
    #[error("storage failure: {0}")]
    Storage(#[source] StorageError),
}

impl From<StorageError> for BookingError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Overlap => BookingError::Conflict { conflicting_id: None },
            other => BookingError::Storage(other),
        }
    }
}
