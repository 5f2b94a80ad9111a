//! Mapping of raw upstream transactions into canonical records.
//!
//! One pure function per upstream kind. Each returns a
//! [`NormalizeError`](crate::domain::NormalizeError) for
//! the single transaction it could not map; callers skip and log those.

mod batch;
mod deposit;
mod p2p;
mod pay;

pub use batch::normalize_all;
pub use deposit::normalize_deposit;
pub use p2p::normalize_p2p_order;
pub use pay::normalize_pay_transaction;
