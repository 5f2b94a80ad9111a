//! Binance SAPI client.
//!
//! Three signed endpoints feed the pipeline:
//! - `GET /sapi/v1/c2c/orderMatch/listUserOrderHistory`: P2P orders, paged,
//!   queried once per trade side
//! - `GET /sapi/v1/pay/transactions`: Binance Pay transfers
//! - `GET /sapi/v1/capital/deposit/hisrec`: on-chain deposits

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::{form_urlencoded, Url};

use super::dto::{Envelope, ErrorBody};
use super::settings::BinanceConfig;
use super::signer::Signer;
use crate::adapter::outbound::http::{should_retry, should_retry_status, HttpConfig};
use crate::domain::{Deposit, P2pOrder, PayTransaction};
use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::exchange::TransactionSource;

const P2P_HISTORY_PATH: &str = "/sapi/v1/c2c/orderMatch/listUserOrderHistory";
const PAY_HISTORY_PATH: &str = "/sapi/v1/pay/transactions";
const DEPOSIT_HISTORY_PATH: &str = "/sapi/v1/capital/deposit/hisrec";

const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const P2P_TRADE_TYPES: [&str; 2] = ["BUY", "SELL"];
const PAY_LIMIT: u32 = 100;
const DEPOSIT_LIMIT: u32 = 1000;
/// Upper bound on P2P pages per side in one fetch.
const MAX_P2P_PAGES: u32 = 50;
/// Upper bound on deposit pages in one fetch.
const MAX_DEPOSIT_PAGES: u32 = 50;

/// Signed REST client for the Binance account history endpoints.
pub struct BinanceClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    signer: Signer,
    recv_window_ms: u64,
    page_rows: u32,
    retry: HttpConfig,
}

impl BinanceClient {
    /// Build a client from config. Fails when credentials are missing.
    pub fn from_config(config: &BinanceConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingField {
                field: "BINANCE_API_KEY",
            })?;
        let api_secret = config
            .api_secret
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingField {
                field: "BINANCE_API_SECRET",
            })?;
        Url::parse(&config.api_url)?;

        Ok(Self {
            http: config.http.build_client()?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            signer: Signer::new(api_secret),
            recv_window_ms: config.recv_window_ms,
            page_rows: config.p2p_page_rows.max(1),
            retry: config.http.clone(),
        })
    }

    /// Encode `params`, append `recvWindow` and `timestamp`, then sign the
    /// whole string and append `signature`.
    fn signed_query(&self, params: &[(&str, String)], timestamp_ms: i64) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            query.append_pair(key, value);
        }
        query.append_pair("recvWindow", &self.recv_window_ms.to_string());
        query.append_pair("timestamp", &timestamp_ms.to_string());
        let mut query = query.finish();

        let signature = self.signer.sign(&query);
        query.push_str("&signature=");
        query.push_str(&signature);
        query
    }

    fn endpoint(&self, path: &str, query: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))?;
        url.set_query(Some(query));
        Ok(url)
    }

    /// Signed GET with retries on transport failures.
    ///
    /// Each attempt is re-signed with a fresh timestamp so retries stay inside
    /// the receive window.
    async fn signed_get<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let query = self.signed_query(params, Utc::now().timestamp_millis());
            let url = self.endpoint(path, &query)?;

            let response = self
                .http
                .get(url)
                .header(API_KEY_HEADER, &self.api_key)
                .send()
                .await;
            let response = match response {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    if attempt >= max_attempts || !should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            if !status.is_success() {
                if attempt < max_attempts && should_retry_status(status) {
                    self.backoff(attempt, max_attempts, &status).await;
                    continue;
                }
                return Err(ErrorBody::into_error(status, &body));
            }
            debug!(path, bytes = body.len(), "Binance response received");
            return Ok(serde_json::from_str(&body)?);
        }
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &(dyn fmt::Display + Sync)) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "Binance request failed, retrying"
        );
        let delay = self.retry.backoff();
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    async fn p2p_side(&self, trade_type: &str, since: Option<DateTime<Utc>>) -> Result<Vec<P2pOrder>> {
        let mut orders = Vec::new();
        let mut page = 1;

        loop {
            let params = p2p_params(trade_type, since, page, self.page_rows);
            let envelope: Envelope<P2pOrder> = self.signed_get(P2P_HISTORY_PATH, &params).await?;
            let batch = envelope.into_data()?;
            let received = batch.len();
            orders.extend(batch);

            if !is_full_page(received, self.page_rows) {
                break;
            }
            if page >= MAX_P2P_PAGES {
                warn!(trade_type, pages = page, "P2P history truncated at page cap");
                break;
            }
            page += 1;
        }

        Ok(orders)
    }

    /// Deposit history is newest first, so a window larger than one page
    /// would lose its oldest entries. Walk it with `offset`.
    async fn deposit_pages(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Deposit>> {
        let mut deposits = Vec::new();
        let mut page = 1;

        loop {
            let params = deposit_params(since, deposits.len(), DEPOSIT_LIMIT);
            let batch: Vec<Deposit> = self.signed_get(DEPOSIT_HISTORY_PATH, &params).await?;
            let received = batch.len();
            deposits.extend(batch);

            if !is_full_page(received, DEPOSIT_LIMIT) {
                break;
            }
            if page >= MAX_DEPOSIT_PAGES {
                warn!(pages = page, "Deposit history truncated at page cap");
                break;
            }
            page += 1;
        }

        Ok(deposits)
    }
}

/// A page holding `limit` items may have more behind it.
fn is_full_page(received: usize, limit: u32) -> bool {
    received >= limit as usize
}

fn p2p_params(
    trade_type: &str,
    since: Option<DateTime<Utc>>,
    page: u32,
    rows: u32,
) -> Vec<(&'static str, String)> {
    let mut params = vec![("tradeType", trade_type.to_string())];
    if let Some(since) = since {
        params.push(("startTimestamp", since.timestamp_millis().to_string()));
    }
    params.push(("page", page.to_string()));
    params.push(("rows", rows.to_string()));
    params
}

fn windowed_params(since: Option<DateTime<Utc>>, limit: u32) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(2);
    if let Some(since) = since {
        params.push(("startTime", since.timestamp_millis().to_string()));
    }
    params.push(("limit", limit.to_string()));
    params
}

fn deposit_params(
    since: Option<DateTime<Utc>>,
    offset: usize,
    limit: u32,
) -> Vec<(&'static str, String)> {
    let mut params = windowed_params(since, limit);
    if offset > 0 {
        params.push(("offset", offset.to_string()));
    }
    params
}

#[async_trait]
impl TransactionSource for BinanceClient {
    async fn p2p_orders(&self, since: Option<DateTime<Utc>>) -> Result<Vec<P2pOrder>> {
        let mut orders = Vec::new();
        for trade_type in P2P_TRADE_TYPES {
            orders.extend(self.p2p_side(trade_type, since).await?);
        }
        debug!(count = orders.len(), "Fetched P2P orders");
        Ok(orders)
    }

    async fn pay_transactions(&self, since: Option<DateTime<Utc>>) -> Result<Vec<PayTransaction>> {
        let params = windowed_params(since, PAY_LIMIT);
        let envelope: Envelope<PayTransaction> = self.signed_get(PAY_HISTORY_PATH, &params).await?;
        let transactions = envelope.into_data()?;
        if is_full_page(transactions.len(), PAY_LIMIT) {
            // The Pay history has no offset; a full page may hide older transfers.
            warn!(
                limit = PAY_LIMIT,
                since = ?since,
                "Pay history page is full, older transfers in this window may be missing"
            );
        }
        debug!(count = transactions.len(), "Fetched Pay transactions");
        Ok(transactions)
    }

    async fn deposits(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Deposit>> {
        let deposits = self.deposit_pages(since).await?;
        debug!(count = deposits.len(), "Fetched deposits");
        Ok(deposits)
    }

    fn exchange_name(&self) -> &'static str {
        "binance"
    }
}

impl fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .field("recv_window_ms", &self.recv_window_ms)
            .finish_non_exhaustive()
    }
}
