//! Application services (use cases).
//!
//! The record pipeline: normalizers, fetchers, the deduplication filter, the
//! submission sink and the single-cycle runner that ties them together.

pub mod cycle;
pub mod dedup;
pub mod fetch;
pub mod normalize;
pub mod submit;

pub use cycle::{CycleOutcome, Pipeline, WatermarkPolicy};
pub use dedup::{filter_known, remove_known, Deduplicated};
pub use fetch::{fetch_all, fetch_deposits, fetch_p2p, fetch_pay, Fetched};
pub use submit::{submit, Submission};
