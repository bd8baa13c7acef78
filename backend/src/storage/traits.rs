//! # Storage Traits
//!
//! Abstractions the domain layer is written against, so the booking service
//! can be exercised against any backend that upholds the same guarantees.

use async_trait::async_trait;
use shared::Booking;

use super::repositories::StorageError;

/// Trait defining the interface for booking storage operations
#[async_trait]
pub trait BookingStorage: Send + Sync {
    /// All bookings ordered by date, start time, studio and id
    async fn list_bookings(&self) -> Result<Vec<Booking>, StorageError>;

    /// Retrieve a specific booking by ID
    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StorageError>;

    /// Bookings of one studio on one date, ordered by start time
    async fn bookings_on(&self, studio: &str, date: &str) -> Result<Vec<Booking>, StorageError>;

    /// Store a new booking.
    ///
    /// Fails with [`StorageError::Overlap`] when the store itself detects an
    /// overlapping row and [`StorageError::DuplicateId`] on an id collision.
    async fn insert_booking(&self, booking: &Booking) -> Result<(), StorageError>;

    /// Replace a stored booking. Returns false if no row has that id.
    async fn update_booking(&self, booking: &Booking) -> Result<bool, StorageError>;

    /// Delete a booking.
    /// Returns true if the booking was found and deleted, false otherwise
    async fn delete_booking(&self, id: &str) -> Result<bool, StorageError>;

    async fn count_bookings(&self) -> Result<u64, StorageError>;
}

/// Factory for repositories sharing one underlying connection
pub trait Connection: Send + Sync + Clone {
    /// The type of BookingStorage this connection creates
    type BookingRepository: BookingStorage;

    /// Create a new booking repository for this connection
    fn create_booking_repository(&self) -> Self::BookingRepository;
}
