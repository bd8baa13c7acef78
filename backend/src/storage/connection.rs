use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::storage::repositories::BookingRepository;
use crate::storage::traits::Connection;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// DbConnection owns the SQLite pool and tracks whether the schema exists.
///
/// The pool connects lazily, so a database that is unreachable at startup
/// does not stop the server from listening. Schema setup is retried on the
/// next store operation until it succeeds once.
#[derive(Clone)]
pub struct DbConnection {
    pool: SqlitePool,
    schema: Arc<OnceCell<()>>,
}

impl DbConnection {
    /// Build a lazily connecting pool. Fails only on a malformed URL.
    pub fn connect_lazy(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            schema: Arc::new(OnceCell::new()),
        })
    }

    /// Connect and set up the schema immediately.
    pub async fn new(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let connection = Self::connect_lazy(url, max_connections)?;
        connection.ensure_schema().await?;
        Ok(connection)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn is_schema_ready(&self) -> bool {
        self.schema.initialized()
    }

    /// Create the table, index and overlap triggers if they are missing.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        self.schema
            .get_or_try_init(|| Self::setup_schema(&self.pool))
            .await
            .map(|_| ())
    }

    /// Startup initialization: a fixed number of attempts with a fixed delay.
    ///
    /// Returns whether the schema is ready. Exhausting the attempts is logged
    /// and otherwise ignored; later operations keep retrying lazily.
    pub async fn init_with_retry(&self, attempts: u32, delay: Duration) -> bool {
        let attempts = attempts.max(1);
        for attempt in 1..=attempts {
            match self.ensure_schema().await {
                Ok(()) => {
                    info!("Database schema ready (attempt {}/{})", attempt, attempts);
                    return true;
                }
                Err(e) => {
                    warn!("Database initialization attempt {}/{} failed: {}", attempt, attempts, e);
                    if attempt < attempts {
                        info!("Retrying in {:?}", delay);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
        error!("Database initialization failed; the server keeps running and will retry on demand");
        false
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bookings (
                id TEXT PRIMARY KEY,
                studio TEXT NOT NULL,
                date TEXT NOT NULL,
                startTime TEXT NOT NULL,
                endTime TEXT NOT NULL,
                photographer TEXT NOT NULL,
                contact TEXT,
                notes TEXT,
                createdAt TEXT NOT NULL,
                CHECK (startTime < endTime)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_bookings_studio_date
            ON bookings(studio, date);
            "#,
        )
        .execute(pool)
        .await?;

        // Times are fixed-format HH:MM, so text comparison is chronological.
        sqlx::query(
            r#"
            CREATE TRIGGER IF NOT EXISTS bookings_no_overlap_insert
            BEFORE INSERT ON bookings
            WHEN EXISTS (
                SELECT 1 FROM bookings
                WHERE studio = NEW.studio
                  AND date = NEW.date
                  AND startTime < NEW.endTime
                  AND endTime > NEW.startTime
            )
            BEGIN
                SELECT RAISE(ABORT, 'booking_overlap');
            END;
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TRIGGER IF NOT EXISTS bookings_no_overlap_update
            BEFORE UPDATE OF studio, date, startTime, endTime ON bookings
            WHEN EXISTS (
                SELECT 1 FROM bookings
                WHERE id <> NEW.id
                  AND studio = NEW.studio
                  AND date = NEW.date
                  AND startTime < NEW.endTime
                  AND endTime > NEW.startTime
            )
            BEGIN
                SELECT RAISE(ABORT, 'booking_overlap');
            END;
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type BookingRepository = BookingRepository;

    fn create_booking_repository(&self) -> Self::BookingRepository {
        BookingRepository::new(self.clone())
    }
}
