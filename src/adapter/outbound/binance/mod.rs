//! Binance adapter.
//!
//! Signed REST access to P2P, Pay and deposit history.

mod client;
pub mod dto;
mod settings;
mod signer;

pub use client::BinanceClient;
pub use settings::BinanceConfig;
pub use signer::Signer;
