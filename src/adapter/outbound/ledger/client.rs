//! REST client for the downstream ledger.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::settings::LedgerConfig;
use crate::adapter::outbound::http::{should_retry, should_retry_status, HttpConfig};
use crate::domain::Record;
use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::ledger::Ledger;

/// Minimal view of a stored record; only the id matters for dedup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    #[serde(default)]
    external_id: Option<String>,
}

/// The listing endpoint returns either a bare array or `{ "records": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordListing {
    Bare(Vec<StoredRecord>),
    Wrapped { records: Vec<StoredRecord> },
}

impl RecordListing {
    fn into_ids(self) -> HashSet<String> {
        let records = match self {
            Self::Bare(records) | Self::Wrapped { records } => records,
        };
        records
            .into_iter()
            .filter_map(|r| r.external_id)
            .filter(|id| !id.is_empty())
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct BulkInsert<'a> {
    records: &'a [Record],
}

/// HTTP client for the ledger's record endpoints.
pub struct LedgerClient {
    http: HttpClient,
    records_url: Url,
    bulk_url: Url,
    key_header: HeaderName,
    key_value: HeaderValue,
    retry: HttpConfig,
}

impl LedgerClient {
    /// Build a client from config. Fails when the URL or API key is missing
    /// or malformed.
    pub fn from_config(config: &LedgerConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "ledger.base_url",
            }
            .into());
        }
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingField {
                field: "LEDGER_API_KEY",
            })?;

        let key_header = HeaderName::from_bytes(config.api_key_header.as_bytes()).map_err(|e| {
            ConfigError::InvalidValue {
                field: "ledger.api_key_header",
                reason: e.to_string(),
            }
        })?;
        let mut key_value = HeaderValue::from_str(api_key).map_err(|e| ConfigError::InvalidValue {
            field: "LEDGER_API_KEY",
            reason: e.to_string(),
        })?;
        key_value.set_sensitive(true);

        Ok(Self {
            http: config.http.build_client()?,
            records_url: join(&config.base_url, &config.records_path)?,
            bulk_url: join(&config.base_url, &config.bulk_path)?,
            key_header,
            key_value,
            retry: config.http.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(self.key_header.clone(), self.key_value.clone())
    }

    /// GET the listing, retrying transport failures.
    async fn get_listing(&self) -> Result<Response> {
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let request = self.authorized(self.http.get(self.records_url.clone()));
            let reason = match request.send().await {
                Ok(response)
                    if attempt < max_attempts && should_retry_status(response.status()) =>
                {
                    response.status().to_string()
                }
                Ok(response) => return Ok(response),
                Err(err) => {
                    if attempt >= max_attempts || !should_retry(&err) {
                        return Err(err.into());
                    }
                    err.to_string()
                }
            };
            warn!(attempt, max_attempts, error = %reason, "Ledger lookup failed, retrying");
            let delay = self.retry.backoff();
            if !delay.is_zero() {
                sleep(delay).await;
            }
        }
    }
}

/// Join a base URL and an absolute path without dropping any base path.
fn join(base: &str, path: &str) -> Result<Url> {
    let base = base.trim().trim_end_matches('/');
    let path = path.trim();
    let url = if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    };
    Ok(Url::parse(&url)?)
}

async fn rejection(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let snippet: String = body.chars().take(200).collect();
    Error::Ledger(format!("HTTP {status}: {snippet}"))
}

#[async_trait]
impl Ledger for LedgerClient {
    async fn known_external_ids(&self) -> Result<HashSet<String>> {
        let response = self.get_listing().await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let listing: RecordListing = serde_json::from_str(&response.text().await?)?;
        let ids = listing.into_ids();
        debug!(count = ids.len(), "Loaded known external ids");
        Ok(ids)
    }

    async fn submit(&self, records: &[Record]) -> Result<()> {
        let body = BulkInsert { records };
        let response = self
            .authorized(self.http.post(self.bulk_url.clone()))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        info!(count = records.len(), "Ledger accepted bulk insert");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ledger"
    }
}

impl std::fmt::Debug for LedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerClient")
            .field("records_url", &self.records_url.as_str())
            .field("bulk_url", &self.bulk_url.as_str())
            .field("key_header", &self.key_header)
            .finish_non_exhaustive()
    }
}
