//! Downstream ledger adapter.

mod client;
mod settings;

pub use client::LedgerClient;
pub use settings::LedgerConfig;
