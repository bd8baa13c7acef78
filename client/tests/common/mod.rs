#![allow(dead_code)]

use shared::{BookingDraft, CreatedAt};
use studio_booking_backend::{create_router, initialize_backend, ServerConfig};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A booking store listening on an ephemeral local port.
pub struct TestServer {
    _temp_dir: TempDir,
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", temp_dir.path().join("bookings.db").display());
        let mut config = ServerConfig::for_database(url);
        config.db_max_connections = 5;

        let state = initialize_backend(&config).expect("Failed to initialize backend");
        state
            .connection
            .ensure_schema()
            .await
            .expect("Failed to set up schema");
        let router = create_router(state, &config);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test server failed");
        });

        Self {
            _temp_dir: temp_dir,
            base_url: format!("http://{}", addr),
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn draft(id: &str, start: &str, end: &str, photographer: &str) -> BookingDraft {
    BookingDraft {
        id: Some(id.to_string()),
        studio: Some("Studio 1".to_string()),
        date: Some("2026-01-28".to_string()),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        photographer: Some(photographer.to_string()),
        created_at: Some(CreatedAt::Millis(1_769_590_800_000)),
        ..BookingDraft::default()
    }
}
