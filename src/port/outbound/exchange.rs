//! Upstream exchange port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Deposit, P2pOrder, PayTransaction};
use crate::error::Result;

/// Source of raw upstream transactions.
///
/// Each method accepts an optional inclusive lower bound; `None` requests the
/// full history the exchange is willing to return. Authentication and request
/// signing are internal to the implementation.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Completed and in-flight P2P orders, both trade directions.
    async fn p2p_orders(&self, since: Option<DateTime<Utc>>) -> Result<Vec<P2pOrder>>;

    /// Deposit history.
    async fn deposits(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Deposit>>;

    /// Pay transfers, both incoming and outgoing.
    async fn pay_transactions(&self, since: Option<DateTime<Utc>>) -> Result<Vec<PayTransaction>>;

    /// Exchange name for logging.
    fn exchange_name(&self) -> &'static str;
}
