//! Exchange-agnostic domain types: the canonical record, raw upstream
//! transactions, amounts, identifiers and the fetch watermark.

pub mod error;
pub mod id;
pub mod money;
pub mod record;
pub mod transaction;
pub mod watermark;

pub use error::{NormalizeError, RecordError};
pub use id::ExternalId;
pub use money::MinorUnits;
pub use record::{Direction, Record, RecordBuilder};
pub use transaction::{Deposit, P2pOrder, PayParty, PayTransaction, TransactionKind};
pub use watermark::Watermark;
