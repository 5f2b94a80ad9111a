//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Driving side: the command line
//! - [`outbound`] - Driven side: Binance, the ledger API, checkpoints

pub mod inbound;
pub mod outbound;
