use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::error;

use crate::domain::BookingError;

/// An HTTP status with the message sent back as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match &err {
            BookingError::Validation(_) => ApiError::new(StatusCode::BAD_REQUEST, err.to_string()),
            BookingError::Conflict { .. } | BookingError::DuplicateId(_) => {
                ApiError::new(StatusCode::CONFLICT, err.to_string())
            }
            BookingError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, err.to_string()),
            BookingError::Storage(source) => {
                error!("Storage failure: {}", source);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "database error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Malformed bodies are client errors whatever axum would pick.
        ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
