//! Binance exchange configuration.

use serde::Deserialize;

use super::super::http::HttpConfig;

/// Binance REST settings.
///
/// Credentials are loaded from `BINANCE_API_KEY` and `BINANCE_API_SECRET` at
/// runtime (never from the config file).
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// `recvWindow` sent with signed requests, in milliseconds.
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    /// Page size for the P2P order history.
    #[serde(default = "default_p2p_page_rows")]
    pub p2p_page_rows: u32,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(skip)]
    pub api_key: Option<String>,
    #[serde(skip)]
    pub api_secret: Option<String>,
}

fn default_api_url() -> String {
    "https://api.binance.com".into()
}

const fn default_recv_window_ms() -> u64 {
    5_000
}

const fn default_p2p_page_rows() -> u32 {
    100
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            recv_window_ms: default_recv_window_ms(),
            p2p_page_rows: default_p2p_page_rows(),
            http: HttpConfig::default(),
            api_key: None,
            api_secret: None,
        }
    }
}
