//! Ledger API configuration.

use serde::Deserialize;

use super::super::http::HttpConfig;

/// Downstream ledger REST settings.
///
/// `LEDGER_API_KEY` is read from the environment; `LEDGER_BASE_URL`, when
/// set, overrides `base_url`.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub base_url: String,
    /// Path listing existing records.
    #[serde(default = "default_records_path")]
    pub records_path: String,
    /// Path accepting bulk inserts.
    #[serde(default = "default_bulk_path")]
    pub bulk_path: String,
    /// Header carrying the API key.
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_records_path() -> String {
    "/api/records".into()
}

fn default_bulk_path() -> String {
    "/api/records/bulk".into()
}

fn default_api_key_header() -> String {
    "x-api-key".into()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            records_path: default_records_path(),
            bulk_path: default_bulk_path(),
            api_key_header: default_api_key_header(),
            http: HttpConfig::default(),
            api_key: None,
        }
    }
}
