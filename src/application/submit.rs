//! Submission sink.

use tracing::{error, info};

use crate::domain::Record;
use crate::port::Ledger;

/// Log target for failures that can lose records.
pub const ALERT_TARGET: &str = "ledgerbridge::alert";

/// What happened to a batch handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing to send; no request was made.
    Skipped,
    /// Batch accepted by the ledger.
    Submitted { count: usize },
    /// Dry run: batch logged instead of sent.
    DryRun { count: usize },
    /// The bulk request failed.
    Failed { count: usize, reason: String },
}

impl Submission {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Records confirmed by the ledger.
    #[must_use]
    pub fn submitted(&self) -> usize {
        match self {
            Self::Submitted { count } => *count,
            _ => 0,
        }
    }
}

/// Send `records` to the ledger as one bulk request.
///
/// An empty batch makes no request. Failures are not retried here.
pub async fn submit(ledger: &dyn Ledger, records: &[Record], dry_run: bool) -> Submission {
    if records.is_empty() {
        return Submission::Skipped;
    }

    let count = records.len();
    if dry_run {
        for record in records {
            info!(
                external_id = record.external_id().map(|id| id.as_str()).unwrap_or_default(),
                direction = %record.direction(),
                amount = %record.amount(),
                currency = record.currency(),
                date = %record.date(),
                description = record.description(),
                "Dry run: would submit record"
            );
        }
        return Submission::DryRun { count };
    }

    match ledger.submit(records).await {
        Ok(()) => {
            info!(ledger = ledger.name(), count, "Submitted records");
            Submission::Submitted { count }
        }
        Err(e) => {
            error!(
                target: ALERT_TARGET,
                ledger = ledger.name(),
                count,
                error = %e,
                "Bulk submission failed"
            );
            Submission::Failed {
                count,
                reason: e.to_string(),
            }
        }
    }
}
