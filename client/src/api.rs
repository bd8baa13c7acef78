use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{Booking, BookingUpdate, ErrorResponse, HealthResponse, MessageResponse};
use tracing::{debug, info};

use crate::error::{ClientError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// API client for communicating with the booking store
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Result<Self> {
        Self::with_base_url("http://localhost:3000")
    }

    /// Create a new API client with a custom base URL.
    ///
    /// Fails only if the HTTP client cannot be built; the request timeout is
    /// never silently dropped.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Test connection to the backend
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self.http.get(self.url("/health")).send().await?;
        parse_json(response).await
    }

    pub async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let response = self.http.get(self.url("/api/bookings")).send().await?;
        let bookings: Vec<Booking> = parse_json(response).await?;
        debug!("Fetched {} bookings from {}", bookings.len(), self.base_url);
        Ok(bookings)
    }

    pub async fn create_booking(&self, booking: &Booking) -> Result<Booking> {
        info!("Sending booking {} to {}", booking.id, self.base_url);
        let response = self
            .http
            .post(self.url("/api/bookings"))
            .json(booking)
            .send()
            .await?;
        parse_json(response).await
    }

    pub async fn update_booking(&self, id: &str, update: &BookingUpdate) -> Result<Booking> {
        let response = self
            .http
            .put(self.url(&format!("/api/bookings/{}", id)))
            .json(update)
            .send()
            .await?;
        parse_json(response).await
    }

    pub async fn delete_booking(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/api/bookings/{}", id)))
            .send()
            .await?;
        let _: MessageResponse = parse_json(response).await?;
        Ok(())
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| if text.is_empty() { status.to_string() } else { text });
    Err(error_for_status(status, message))
}

fn error_for_status(status: StatusCode, message: String) -> ClientError {
    match status {
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        StatusCode::CONFLICT => ClientError::Conflict(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Server { status, message },
    }
}
