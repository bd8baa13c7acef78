use reqwest::StatusCode;
use shared::ValidationError;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything a client action can fail with; callers show these as toasts.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid booking: {0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("only the photographer who made a booking can cancel it")]
    NotOwner,
    #[error("server returned {status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("local storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("malformed data: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{0}")]
    Auth(String),
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Validation(err.to_string())
    }
}

impl ClientError {
    pub fn conflict() -> Self {
        ClientError::Conflict("time slot already booked".to_string())
    }
}
