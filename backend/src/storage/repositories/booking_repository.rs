use async_trait::async_trait;
use shared::{Booking, CreatedAt};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::connection::DbConnection;
use crate::storage::traits::BookingStorage;

/// Message raised by the overlap triggers.
const OVERLAP_MARKER: &str = "booking_overlap";

const SELECT_COLUMNS: &str =
    "SELECT id, studio, date, startTime, endTime, photographer, contact, notes, createdAt FROM bookings";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("booking overlaps an existing booking")]
    Overlap,
    #[error("a booking with this id already exists")]
    DuplicateId,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Sort a write failure into the cases callers react to.
    fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.message().contains(OVERLAP_MARKER) {
                return StorageError::Overlap;
            }
            if db_err.is_unique_violation() {
                return StorageError::DuplicateId;
            }
        }
        StorageError::Database(err)
    }
}

/// Repository for booking rows
#[derive(Clone)]
pub struct BookingRepository {
    db: DbConnection,
}

impl BookingRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn booking_from_row(row: &SqliteRow) -> Result<Booking, sqlx::Error> {
        let created_at: String = row.try_get("createdAt")?;
        Ok(Booking {
            id: row.try_get("id")?,
            studio: row.try_get("studio")?,
            date: row.try_get("date")?,
            start_time: row.try_get("startTime")?,
            end_time: row.try_get("endTime")?,
            photographer: row.try_get("photographer")?,
            contact: row.try_get("contact")?,
            note: row.try_get("notes")?,
            created_at: CreatedAt::from_stored(&created_at),
        })
    }
}

#[async_trait]
impl BookingStorage for BookingRepository {
    async fn list_bookings(&self) -> Result<Vec<Booking>, StorageError> {
        self.db.ensure_schema().await?;

        let query = format!("{} ORDER BY date, startTime, studio, id", SELECT_COLUMNS);
        let rows = sqlx::query(&query).fetch_all(self.db.pool()).await?;

        let bookings = rows
            .iter()
            .map(Self::booking_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bookings)
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StorageError> {
        self.db.ensure_schema().await?;

        let query = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(r) => Ok(Some(Self::booking_from_row(&r)?)),
            None => Ok(None),
        }
    }

    async fn bookings_on(&self, studio: &str, date: &str) -> Result<Vec<Booking>, StorageError> {
        self.db.ensure_schema().await?;

        let query = format!(
            "{} WHERE studio = ? AND date = ? ORDER BY startTime, id",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(studio)
            .bind(date)
            .fetch_all(self.db.pool())
            .await?;

        let bookings = rows
            .iter()
            .map(Self::booking_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bookings)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StorageError> {
        self.db.ensure_schema().await?;

        sqlx::query(
            r#"
            INSERT INTO bookings (id, studio, date, startTime, endTime, photographer, contact, notes, createdAt)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.studio)
        .bind(&booking.date)
        .bind(&booking.start_time)
        .bind(&booking.end_time)
        .bind(&booking.photographer)
        .bind(&booking.contact)
        .bind(&booking.note)
        .bind(booking.created_at.to_string())
        .execute(self.db.pool())
        .await
        .map_err(StorageError::from_write)?;
        Ok(())
    }

    async fn update_booking(&self, booking: &Booking) -> Result<bool, StorageError> {
        self.db.ensure_schema().await?;

        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET studio = ?, date = ?, startTime = ?, endTime = ?,
                photographer = ?, contact = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(&booking.studio)
        .bind(&booking.date)
        .bind(&booking.start_time)
        .bind(&booking.end_time)
        .bind(&booking.photographer)
        .bind(&booking.contact)
        .bind(&booking.note)
        .bind(&booking.id)
        .execute(self.db.pool())
        .await
        .map_err(StorageError::from_write)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_booking(&self, id: &str) -> Result<bool, StorageError> {
        self.db.ensure_schema().await?;

        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_bookings(&self) -> Result<u64, StorageError> {
        self.db.ensure_schema().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count.max(0) as u64)
    }
}
