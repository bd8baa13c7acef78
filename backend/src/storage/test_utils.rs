//! RAII test environment backed by a throwaway SQLite file.
//!
//! An in-memory database would give every pooled connection its own empty
//! database, so tests use a file inside a temporary directory instead.

use anyhow::Result;
use shared::{Booking, CreatedAt};
use tempfile::TempDir;

use super::connection::DbConnection;

pub struct TestEnvironment {
    /// Kept alive so the directory is removed only on drop
    _temp_dir: TempDir,
    pub connection: DbConnection,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let url = format!("sqlite://{}", temp_dir.path().join("bookings.db").display());
        let connection = DbConnection::new(&url, 5).await?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
        })
    }
}

pub fn sample_booking(id: &str, studio: &str, date: &str, start: &str, end: &str) -> Booking {
    Booking {
        id: id.to_string(),
        studio: studio.to_string(),
        date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        photographer: "X".to_string(),
        contact: None,
        note: None,
        created_at: CreatedAt::Text("2026-01-27T08:00:00.000Z".to_string()),
    }
}
