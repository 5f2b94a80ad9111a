//! ledgerbridge - Binance history to bookkeeping ledger.
//!
//! Polls Binance P2P orders, Binance Pay transfers and deposits, normalizes
//! them into one canonical [`Record`](domain::Record) shape, drops records the
//! ledger already holds, and submits the rest in a single bulk request.
//!
//! # Architecture
//!
//! - [`domain`] - Canonical record, raw upstream transactions, amounts,
//!   external ids and the fetch watermark
//! - [`port`] - Traits for the exchange, the ledger and the checkpoint
//! - [`application`] - Normalizers, fetchers, the deduplication filter, the
//!   submission sink and the single-cycle [`Pipeline`](application::Pipeline)
//! - [`adapter`] - Binance and ledger REST clients, checkpoint stores, the CLI
//! - [`infrastructure`] - Configuration, wiring and the polling loop
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ledgerbridge::application::Pipeline;
//! use ledgerbridge::domain::Watermark;
//! # use ledgerbridge::port::{Ledger, TransactionSource};
//! # async fn demo(source: Arc<dyn TransactionSource>, ledger: Arc<dyn Ledger>) {
//! let pipeline = Pipeline::new(source, ledger);
//! let outcome = pipeline.run_cycle(Watermark::empty()).await;
//! println!("submitted {}", outcome.submission.submitted());
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
