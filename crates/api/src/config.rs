//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `STOCKSENSE_HOST` - Bind address (default: 0.0.0.0)
//! - `STOCKSENSE_PORT` - Listen port (default: 8080)
//! - `STOCKSENSE_LOG_FORMAT` - `json` or `pretty` (default: json)
//! - `STOCKSENSE_STORAGE` - `memory` or `postgres` (default: memory)
//! - `DATABASE_URL` - Postgres connection string, required when storage is `postgres`
//! - `STOCKSENSE_VELOCITY` - `trailing` or `stock-presence` (default: trailing)
//! - `STOCKSENSE_STOCKOUT_WINDOW_DAYS` - Trailing sales window in days (default: 14, min 1)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use stocksense_analytics::VelocityPolicy;
use stocksense_analytics::stockout::DEFAULT_WINDOW_DAYS;
use stocksense_infra::InsightSettings;
use stocksense_observability::LogFormat;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(String),
    #[error("Invalid environment variable {0}: {1}")]
    Invalid(String, String),
}

/// Where products and sales are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub log_format: LogFormat,
    pub storage: StorageBackend,
    pub insights: InsightSettings,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Callers load `.env` first if they want it honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let host = get("STOCKSENSE_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| invalid("STOCKSENSE_HOST", e))?;
        let port = get("STOCKSENSE_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| invalid("STOCKSENSE_PORT", e))?;
        let log_format = get("STOCKSENSE_LOG_FORMAT", "json")
            .parse::<LogFormat>()
            .map_err(|e| invalid("STOCKSENSE_LOG_FORMAT", e))?;

        let storage = match get("STOCKSENSE_STORAGE", "memory").to_ascii_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "postgres" => StorageBackend::Postgres {
                database_url: lookup("DATABASE_URL")
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| ConfigError::Missing("DATABASE_URL".to_string()))?,
            },
            other => {
                return Err(invalid(
                    "STOCKSENSE_STORAGE",
                    format!("'{other}', expected memory or postgres"),
                ));
            }
        };

        let window = get("STOCKSENSE_STOCKOUT_WINDOW_DAYS", &DEFAULT_WINDOW_DAYS.to_string())
            .parse::<u32>()
            .map_err(|e| invalid("STOCKSENSE_STOCKOUT_WINDOW_DAYS", e))?;
        if window == 0 {
            return Err(invalid("STOCKSENSE_STOCKOUT_WINDOW_DAYS", "must be at least 1"));
        }

        let velocity = match get("STOCKSENSE_VELOCITY", "trailing").to_ascii_lowercase().as_str() {
            "trailing" => VelocityPolicy::Trailing { days: window },
            "stock-presence" => VelocityPolicy::StockPresence,
            other => {
                return Err(invalid(
                    "STOCKSENSE_VELOCITY",
                    format!("'{other}', expected trailing or stock-presence"),
                ));
            }
        };

        Ok(Self {
            host,
            port,
            log_format,
            storage,
            insights: InsightSettings {
                velocity,
                stockout_window_days: window,
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn invalid(key: &str, err: impl ToString) -> ConfigError {
    ConfigError::Invalid(key.to_string(), err.to_string())
}
