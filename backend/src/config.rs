//! Server configuration read from the environment (and `.env`, via dotenvy).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use shared::ValidationRules;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_INIT_RETRIES: u32 = 5;
const DEFAULT_INIT_RETRY_DELAY_SECS: u64 = 3;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("invalid value for {name}: `{value}`")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Upper bound of the SQLite connection pool
    pub db_max_connections: u32,
    /// Schema setup attempts at startup before serving without a ready store
    pub db_init_retries: u32,
    pub db_init_retry_delay: Duration,
    pub require_contact: bool,
    /// Optional studio allow-list; any studio name is accepted when unset
    pub studios: Option<Vec<String>>,
    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<HeaderValue>,
    /// Directory with the browser front end, served as a fallback
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Defaults for everything except the database location.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            db_init_retries: DEFAULT_INIT_RETRIES,
            db_init_retry_delay: Duration::from_secs(DEFAULT_INIT_RETRY_DELAY_SECS),
            require_contact: false,
            studios: None,
            cors_origin: None,
            static_dir: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;
        let mut config = Self::for_database(database_url);

        config.bind_addr = parse_or(&lookup, "BIND_ADDR", config.bind_addr)?;
        config.port = parse_or(&lookup, "PORT", config.port)?;
        config.db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", config.db_max_connections)?;
        config.db_init_retries = parse_or(&lookup, "DB_INIT_RETRIES", config.db_init_retries)?;
        config.db_init_retry_delay = Duration::from_secs(parse_or(
            &lookup,
            "DB_INIT_RETRY_DELAY_SECS",
            DEFAULT_INIT_RETRY_DELAY_SECS,
        )?);
        config.require_contact = parse_flag(&lookup, "REQUIRE_CONTACT")?;
        config.studios = lookup("STUDIOS").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        });
        config.cors_origin = match lookup("CORS_ORIGIN") {
            Some(origin) => Some(HeaderValue::from_str(&origin).map_err(|_| {
                ConfigError::InvalidValue {
                    name: "CORS_ORIGIN",
                    value: origin.clone(),
                }
            })?),
            None => None,
        };
        config.static_dir = lookup("STATIC_DIR").map(PathBuf::from);

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            require_contact: self.require_contact,
            studios: self.studios.clone(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, name: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("no") => Ok(false),
        Some(other) => Err(ConfigError::InvalidValue {
            name,
            value: other.to_string(),
        }),
    }
}
