//! # Studio Booking Client
//!
//! Client-side state for the booking front end: a cache of every booking,
//! pure view derivations over it, reminders for the signed-in photographer,
//! a small credential store and the two periodic background tasks.
//!
//! Bookings come from a [`BookingSource`]: the REST store in cloud mode, or a
//! JSON file in local mode. Every view function borrows a [`BookingCache`]
//! instead of reading ambient state.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod local_storage;
pub mod reminder;
pub mod session;
pub mod source;
pub mod stats;
pub mod tasks;
pub mod views;

pub use api::ApiClient;
pub use auth::{Authenticator, CredentialCheck, StaticCredentials};
pub use cache::BookingCache;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use local_storage::LocalStorage;
pub use reminder::{LogNotifier, Notification, Notifier, ReminderState};
pub use session::Session;
pub use source::{BookingSource, LocalSource, RemoteSource};
pub use tasks::PeriodicTask;
