use axum::{http::StatusCode, response::{IntoResponse, Json}};
use shared::{HealthResponse, ServiceInfoResponse};

/// Service banner for `GET /` when no front end is being served
pub async fn service_info() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ServiceInfoResponse {
            message: "Studio booking API".to_string(),
            status: "running".to_string(),
        }),
    )
}

/// Liveness probe; does not touch the database
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
}
