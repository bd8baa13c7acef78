use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_REFRESH_SECS: u64 = 30;
const DEFAULT_REMINDER_SECS: u64 = 30;

/// Client settings. `api_base_url` selects the mode: with a URL bookings
/// live in the REST store, without one they live in local storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: Option<String>,
    /// Directory holding the local key/value files
    pub storage_dir: PathBuf,
    pub refresh_interval: Duration,
    pub reminder_interval: Duration,
    /// Studios shown as columns in the list and timeline views
    pub studios: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            storage_dir: PathBuf::from("studio-booking-data"),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            reminder_interval: Duration::from_secs(DEFAULT_REMINDER_SECS),
            studios: vec!["Studio 1".to_string(), "Studio 2".to_string()],
        }
    }
}

impl ClientConfig {
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_base_url = if url.trim().is_empty() {
            None
        } else {
            Some(url.trim_end_matches('/').to_string())
        };
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_reminder_interval(mut self, interval: Duration) -> Self {
        self.reminder_interval = interval;
        self
    }

    pub fn with_studios<I, S>(mut self, studios: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.studios = studios.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_cloud_mode(&self) -> bool {
        self.api_base_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_local_mode() {
        let config = ClientConfig::default();
        assert!(!config.is_cloud_mode());
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.reminder_interval, Duration::from_secs(30));
        assert_eq!(config.studios.len(), 2);
    }

    #[test]
    fn test_api_url_selects_cloud_mode() {
        let config = ClientConfig::default().with_api_base_url("http://localhost:3000/");
        assert!(config.is_cloud_mode());
        assert_eq!(config.api_base_url.as_deref(), Some("http://localhost:3000"));

        // Empty string keeps local mode
        assert!(!ClientConfig::default().with_api_base_url("").is_cloud_mode());
    }
}
