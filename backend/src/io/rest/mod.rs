//! # REST API Interface Layer
//!
//! HTTP endpoints for the booking store:
//!
//! - `GET /` and `GET /health` for liveness
//! - `GET|POST /api/bookings`
//! - `PUT|DELETE /api/bookings/:id`
//!
//! Handlers log the request, call the service and map the outcome; no
//! booking rules live here.

pub mod booking_apis;
pub mod error;
pub mod health_apis;

pub use booking_apis::*;
pub use error::ApiError;
pub use health_apis::*;
