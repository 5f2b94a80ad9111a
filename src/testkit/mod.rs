//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for raw upstream transactions and records.
//! - [`exchange`] - [`ScriptedSource`](exchange::ScriptedSource), a
//!   [`TransactionSource`](crate::port::TransactionSource) with canned data.
//! - [`ledger`] - [`RecordingLedger`](ledger::RecordingLedger), an in-memory
//!   [`Ledger`](crate::port::Ledger) that remembers what was submitted.
//! - [`MemoryWatermarkStore`] for checkpoint round trips.

pub mod domain;
pub mod exchange;
pub mod ledger;

/// In-memory [`WatermarkStore`](crate::port::WatermarkStore).
pub use crate::adapter::outbound::checkpoint::MemoryWatermarkStore;
