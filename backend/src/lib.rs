//! # Studio Booking Backend
//!
//! REST service that stores studio bookings and refuses overlapping ones.
//!
//! The crate is layered the usual way:
//! - **storage**: SQLite persistence behind the `BookingStorage` trait
//! - **domain**: validation, the overlap check and write serialization
//! - **io**: axum handlers translating HTTP to service calls
//!
//! [`initialize_backend`] wires the layers together and [`create_router`]
//! exposes them; `main.rs` only reads configuration and serves.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::Method,
    routing::{get, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::{ConfigError, ServerConfig};
pub use domain::{BookingError, BookingService};
pub use storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub booking_service: BookingService<DbConnection>,
    pub connection: DbConnection,
}

/// Initialize the backend with all required services.
///
/// The pool connects lazily, so this only fails on a malformed database URL;
/// schema setup happens in [`DbConnection::init_with_retry`] or on first use.
pub fn initialize_backend(config: &ServerConfig) -> Result<AppState> {
    info!("Setting up database pool (max {} connections)", config.db_max_connections);
    let connection = DbConnection::connect_lazy(&config.database_url, config.db_max_connections)?;

    info!("Setting up domain model");
    let booking_service = BookingService::new(&connection, config.validation_rules());

    Ok(AppState {
        booking_service,
        connection,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &ServerConfig) -> Router {
    let allow_origin = match &config.cors_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::from(Any),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/bookings", get(io::list_bookings).post(io::create_booking))
        .route("/bookings/:id", put(io::update_booking).delete(io::delete_booking));

    let mut router = Router::new()
        .route("/health", get(io::health))
        .nest("/api", api_routes);

    router = match &config.static_dir {
        Some(dir) => {
            info!("Serving front end from {}", dir.display());
            router.fallback_service(ServeDir::new(dir))
        }
        None => router.route("/", get(io::service_info)),
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
