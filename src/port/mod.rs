//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points of the bridge. The application layer
//! talks to the exchange, the downstream ledger and the watermark checkpoint
//! only through these traits.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  fetch → dedup → submit ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌────────────┐
//! │Exchange │            │   Ledger    │              │ Checkpoint │
//! │ Adapter │            │   Adapter   │              │  Adapter   │
//! └─────────┘            └─────────────┘              └────────────┘
//! ```

pub mod outbound;

pub use outbound::checkpoint::WatermarkStore;
pub use outbound::exchange::TransactionSource;
pub use outbound::ledger::Ledger;
