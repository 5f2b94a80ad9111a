//! Downstream ledger port.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::Record;
use crate::error::Result;

/// Bookkeeping API that receives normalized records.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// External ids of every record the ledger already holds.
    async fn known_external_ids(&self) -> Result<HashSet<String>>;

    /// Submit a batch in a single bulk request.
    async fn submit(&self, records: &[Record]) -> Result<()>;

    /// Ledger name for logging.
    fn name(&self) -> &'static str;
}
