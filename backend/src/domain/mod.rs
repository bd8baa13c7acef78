//! # Domain Module
//!
//! Booking rules that sit between the REST layer and storage: validation,
//! the overlap check and the write serialization that makes the check safe
//! under concurrent requests.

pub mod booking_service;
pub mod error;

pub use booking_service::BookingService;
pub use error::BookingError;
