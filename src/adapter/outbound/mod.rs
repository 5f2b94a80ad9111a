//! Outbound adapters (driven side).

pub mod binance;
pub mod checkpoint;
pub mod http;
pub mod ledger;
