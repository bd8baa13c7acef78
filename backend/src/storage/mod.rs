//! # Storage Module
//!
//! Persistence for bookings. The domain layer only sees the traits in
//! [`traits`]; the SQLite implementation lives in [`connection`] and
//! [`repositories`].
//!
//! The store itself refuses overlapping rows through insert/update triggers,
//! so a conflict is caught even if two writers pass the service-level check
//! at the same time.

pub mod connection;
pub mod repositories;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use connection::DbConnection;
pub use repositories::{BookingRepository, StorageError};
pub use traits::{BookingStorage, Connection};
