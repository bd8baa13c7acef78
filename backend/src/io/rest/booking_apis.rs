//! # REST API for Bookings

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{BookingDraft, BookingUpdate, MessageResponse};
use tracing::{error, info};

use super::error::ApiError;
use crate::AppState;

/// List every booking, ordered by date and start time
pub async fn list_bookings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/bookings");

    match state.booking_service.list_bookings().await {
        Ok(bookings) => (StatusCode::OK, Json(bookings)).into_response(),
        Err(e) => {
            error!("Failed to list bookings: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Create a booking after validation and the overlap check
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<BookingDraft>, JsonRejection>,
) -> impl IntoResponse {
    let Json(draft) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            info!("POST /api/bookings - rejected body: {}", rejection.body_text());
            return ApiError::from(rejection).into_response();
        }
    };
    info!("POST /api/bookings - request: {:?}", draft);

    match state.booking_service.create_booking(draft).await {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(e) => {
            error!("Failed to create booking: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Partially update a booking; absent fields keep their stored value
pub async fn update_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    payload: Result<Json<BookingUpdate>, JsonRejection>,
) -> impl IntoResponse {
    let Json(update) = match payload {
        Ok(body) => body,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!("PUT /api/bookings/{} - request: {:?}", booking_id, update);

    match state.booking_service.update_booking(&booking_id, update).await {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(e) => {
            error!("Failed to update booking {}: {}", booking_id, e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn delete_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/bookings/{}", booking_id);

    match state.booking_service.delete_booking(&booking_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Booking deleted".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to delete booking {}: {}", booking_id, e);
            ApiError::from(e).into_response()
        }
    }
}
