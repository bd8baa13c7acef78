use std::sync::Arc;

use shared::{
    find_conflict, validate_draft, Booking, BookingDraft, BookingUpdate, CreatedAt,
    ValidationRules,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::error::BookingError;
use crate::storage::{BookingStorage, Connection, StorageError};

/// Service for creating, listing, updating and deleting bookings
pub struct BookingService<C: Connection> {
    repository: Arc<C::BookingRepository>,
    rules: ValidationRules,
    /// Serializes check-then-write sequences; reads never take it.
    write_lock: Arc<Mutex<()>>,
}

impl<C: Connection> Clone for BookingService<C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            rules: self.rules.clone(),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

impl<C: Connection> BookingService<C> {
    pub fn new(connection: &C, rules: ValidationRules) -> Self {
        Self {
            repository: Arc::new(connection.create_booking_repository()),
            rules,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Validate, check for overlaps and store a new booking.
    pub async fn create_booking(&self, draft: BookingDraft) -> Result<Booking, BookingError> {
        let valid = validate_draft(&draft, &self.rules)?;
        info!(
            "Creating booking {} for studio {} on {} ({}-{})",
            valid.id,
            valid.studio,
            valid.date,
            valid.range.start(),
            valid.range.end()
        );

        let _guard = self.write_lock.lock().await;

        if self.repository.get_booking(&valid.id).await?.is_some() {
            warn!("Rejected booking {}: id already exists", valid.id);
            return Err(BookingError::DuplicateId(valid.id));
        }

        let same_day = self.repository.bookings_on(&valid.studio, &valid.date).await?;
        if let Some(existing) = find_conflict(&same_day, &valid.studio, &valid.date, &valid.range, None) {
            warn!(
                "Rejected booking {}: overlaps {} ({}-{})",
                valid.id, existing.id, existing.start_time, existing.end_time
            );
            return Err(BookingError::Conflict {
                conflicting_id: Some(existing.id.clone()),
            });
        }

        let booking = valid.into_booking(CreatedAt::now);
        self.repository
            .insert_booking(&booking)
            .await
            .map_err(|e| match e {
                StorageError::DuplicateId => BookingError::DuplicateId(booking.id.clone()),
                other => BookingError::from(other),
            })?;

        info!("Created booking {}", booking.id);
        Ok(booking)
    }

    /// All bookings ordered by date and start time
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, BookingError> {
        let bookings = self.repository.list_bookings().await?;
        info!("Listed {} bookings", bookings.len());
        Ok(bookings)
    }

    /// Merge `update` over the stored booking and re-check it.
    pub async fn update_booking(&self, id: &str, update: BookingUpdate) -> Result<Booking, BookingError> {
        info!("Updating booking {}", id);

        let _guard = self.write_lock.lock().await;

        let existing = self
            .repository
            .get_booking(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        let valid = validate_draft(&update.apply_to(&existing), &self.rules)?;

        let same_day = self.repository.bookings_on(&valid.studio, &valid.date).await?;
        if let Some(other) = find_conflict(&same_day, &valid.studio, &valid.date, &valid.range, Some(id)) {
            warn!("Rejected update of {}: overlaps {}", id, other.id);
            return Err(BookingError::Conflict {
                conflicting_id: Some(other.id.clone()),
            });
        }

        let created_at = existing.created_at.clone();
        let booking = valid.into_booking(move || created_at);
        if !self.repository.update_booking(&booking).await? {
            return Err(BookingError::NotFound(id.to_string()));
        }

        info!("Updated booking {}", id);
        Ok(booking)
    }

    /// Unconditional delete by id; ownership is not checked here.
    pub async fn delete_booking(&self, id: &str) -> Result<(), BookingError> {
        info!("Deleting booking {}", id);

        if !self.repository.delete_booking(id).await? {
            warn!("Booking not found: {}", id);
            return Err(BookingError::NotFound(id.to_string()));
        }

        info!("Deleted booking {}", id);
        Ok(())
    }
}
