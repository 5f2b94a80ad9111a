//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; credentials only ever come from
//! the environment (`BINANCE_API_KEY`, `BINANCE_API_SECRET`, `LEDGER_API_KEY`).
//!
//! # Example
//!
//! ```no_run
//! use ledgerbridge::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use super::poll::PollConfig;
use crate::adapter::outbound::binance::BinanceConfig;
use crate::adapter::outbound::http::HttpConfig;
use crate::adapter::outbound::ledger::LedgerConfig;
use crate::error::{ConfigError, Result};

pub const BINANCE_API_KEY_ENV: &str = "BINANCE_API_KEY";
pub const BINANCE_API_SECRET_ENV: &str = "BINANCE_API_SECRET";
pub const LEDGER_API_KEY_ENV: &str = "LEDGER_API_KEY";
pub const LEDGER_BASE_URL_ENV: &str = "LEDGER_BASE_URL";

/// Binance rejects a `recvWindow` above one minute.
const MAX_RECV_WINDOW_MS: u64 = 60_000;
/// Largest page the C2C history endpoint accepts.
const MAX_P2P_PAGE_ROWS: u32 = 100;

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Fetch, normalize and dedupe, but log batches instead of submitting.
    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub binance: BinanceConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from a TOML string, then apply environment
    /// overrides and validate.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |key| std::env::var(key).ok())
    }

    /// Like [`Config::parse_toml`] with an explicit environment lookup.
    pub fn parse_toml_with_env<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        // Secrets are never read from the config file.
        self.binance.api_key = non_blank(BINANCE_API_KEY_ENV);
        self.binance.api_secret = non_blank(BINANCE_API_SECRET_ENV);
        self.ledger.api_key = non_blank(LEDGER_API_KEY_ENV);

        if let Some(base_url) = non_blank(LEDGER_BASE_URL_ENV) {
            self.ledger.base_url = base_url;
        }
    }

    fn validate(&self) -> Result<()> {
        validate_url("binance.api_url", &self.binance.api_url)?;
        if self.binance.recv_window_ms == 0 || self.binance.recv_window_ms > MAX_RECV_WINDOW_MS {
            return Err(ConfigError::InvalidValue {
                field: "recv_window_ms",
                reason: format!("must be between 1 and {MAX_RECV_WINDOW_MS}"),
            }
            .into());
        }
        if self.binance.p2p_page_rows == 0 || self.binance.p2p_page_rows > MAX_P2P_PAGE_ROWS {
            return Err(ConfigError::InvalidValue {
                field: "p2p_page_rows",
                reason: format!("must be between 1 and {MAX_P2P_PAGE_ROWS}"),
            }
            .into());
        }
        validate_http("binance.http", &self.binance.http)?;

        if self.ledger.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "ledger.base_url",
            }
            .into());
        }
        validate_url("ledger.base_url", &self.ledger.base_url)?;
        if self.ledger.records_path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "ledger.records_path",
            }
            .into());
        }
        if self.ledger.bulk_path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "ledger.bulk_path",
            }
            .into());
        }
        if self.ledger.api_key_header.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "ledger.api_key_header",
            }
            .into());
        }
        validate_http("ledger.http", &self.ledger.http)?;

        if self.poll.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if !LoggingConfig::FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected one of {:?}", LoggingConfig::FORMATS),
            }
            .into());
        }

        Ok(())
    }

    /// Check that every credential needed to talk to Binance and the ledger
    /// is present. `check` skips this; `run` and `once` require it.
    pub fn require_credentials(&self) -> Result<()> {
        if self.binance.api_key.is_none() {
            return Err(ConfigError::MissingField {
                field: BINANCE_API_KEY_ENV,
            }
            .into());
        }
        if self.binance.api_secret.is_none() {
            return Err(ConfigError::MissingField {
                field: BINANCE_API_SECRET_ENV,
            }
            .into());
        }
        if self.ledger.api_key.is_none() {
            return Err(ConfigError::MissingField {
                field: LEDGER_API_KEY_ENV,
            }
            .into());
        }
        Ok(())
    }

    /// Names of credentials that are not set.
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.binance.api_key.is_none() {
            missing.push(BINANCE_API_KEY_ENV);
        }
        if self.binance.api_secret.is_none() {
            missing.push(BINANCE_API_SECRET_ENV);
        }
        if self.ledger.api_key.is_none() {
            missing.push(LEDGER_API_KEY_ENV);
        }
        missing
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<()> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }
        .into());
    }
    Ok(())
}

fn validate_http(field: &'static str, http: &HttpConfig) -> Result<()> {
    if http.timeout_ms == 0 || http.connect_timeout_ms == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "timeouts must be greater than 0".to_string(),
        }
        .into());
    }
    if http.retry_max_attempts == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "retry_max_attempts must be at least 1".to_string(),
        }
        .into());
    }
    Ok(())
}
