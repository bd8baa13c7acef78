#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use studio_booking_backend::{create_router, initialize_backend, ServerConfig};
use tempfile::TempDir;
use tower::ServiceExt;

/// Router over a fresh database file, removed when dropped.
pub struct TestEnvironment {
    _temp_dir: TempDir,
    pub config: ServerConfig,
    pub router: Router,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut ServerConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", temp_dir.path().join("bookings.db").display());
        let mut config = ServerConfig::for_database(url);
        config.db_max_connections = 5;
        adjust(&mut config);

        let state = initialize_backend(&config).expect("Failed to initialize backend");
        state
            .connection
            .ensure_schema()
            .await
            .expect("Failed to set up schema");
        let router = create_router(state, &config);

        Self {
            _temp_dir: temp_dir,
            config,
            router,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(self.router.clone(), method, uri, body).await
    }

    pub async fn list(&self) -> Vec<Value> {
        let (status, body) = self.request(Method::GET, "/api/bookings", None).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().cloned().expect("list should return an array")
    }
}

pub async fn send(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = router.oneshot(request).await.expect("Router should not fail");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub fn booking_json(id: &str, start: &str, end: &str, photographer: &str) -> Value {
    serde_json::json!({
        "id": id,
        "studio": "A",
        "date": "2026-01-28",
        "startTime": start,
        "endTime": end,
        "photographer": photographer
    })
}
