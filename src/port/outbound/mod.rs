//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod checkpoint;
pub mod exchange;
pub mod ledger;
