//! Where bookings are read from and written to.

use async_trait::async_trait;
use shared::Booking;
use tracing::info;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::local_storage::{LocalStorage, BOOKINGS_KEY};

#[async_trait]
pub trait BookingSource: Send + Sync {
    /// Every booking the source holds, in any order
    async fn fetch_all(&self) -> Result<Vec<Booking>>;

    async fn create(&self, booking: &Booking) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// True for the shared REST store; enables the refresh task.
    fn is_remote(&self) -> bool;
}

/// Cloud mode: the REST store is the source of truth.
#[derive(Clone)]
pub struct RemoteSource {
    api: ApiClient,
}

impl RemoteSource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

#[async_trait]
impl BookingSource for RemoteSource {
    async fn fetch_all(&self) -> Result<Vec<Booking>> {
        self.api.list_bookings().await
    }

    async fn create(&self, booking: &Booking) -> Result<()> {
        self.api.create_booking(booking).await.map(|_| ())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete_booking(id).await
    }

    fn is_remote(&self) -> bool {
        true
    }
}

/// Local mode: a JSON array under the `bookings` key.
#[derive(Clone)]
pub struct LocalSource {
    storage: LocalStorage,
}

impl LocalSource {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    fn load(&self) -> Result<Vec<Booking>> {
        Ok(self.storage.get(BOOKINGS_KEY)?.unwrap_or_default())
    }
}

#[async_trait]
impl BookingSource for LocalSource {
    async fn fetch_all(&self) -> Result<Vec<Booking>> {
        self.load()
    }

    async fn create(&self, booking: &Booking) -> Result<()> {
        let mut bookings = self.load()?;
        bookings.push(booking.clone());
        self.storage.set(BOOKINGS_KEY, &bookings)?;
        info!("Saved {} bookings locally", bookings.len());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut bookings = self.load()?;
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        if bookings.len() == before {
            return Err(ClientError::NotFound(id.to_string()));
        }
        self.storage.set(BOOKINGS_KEY, &bookings)?;
        Ok(())
    }

    fn is_remote(&self) -> bool {
        false
    }
}
