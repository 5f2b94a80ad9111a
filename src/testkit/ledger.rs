//! In-memory [`Ledger`] for tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::Record;
use crate::error::{Error, Result};
use crate::port::Ledger;

/// A ledger that records every batch and, once a batch is accepted, reports
/// its external ids as known.
#[derive(Default)]
pub struct RecordingLedger {
    known: Mutex<HashSet<String>>,
    batches: Mutex<Vec<Vec<Record>>>,
    lookups: AtomicUsize,
    lookup_failure: Mutex<Option<String>>,
    submit_failure: Mutex<Option<String>>,
}

impl RecordingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_known<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known.lock().extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn fail_lookup(self, reason: impl Into<String>) -> Self {
        *self.lookup_failure.lock() = Some(reason.into());
        self
    }

    pub fn fail_submit(self, reason: impl Into<String>) -> Self {
        *self.submit_failure.lock() = Some(reason.into());
        self
    }

    /// Clear every scripted failure.
    pub fn recover(&self) {
        *self.lookup_failure.lock() = None;
        *self.submit_failure.lock() = None;
    }

    /// Batches accepted by [`Ledger::submit`], in order.
    pub fn batches(&self) -> Vec<Vec<Record>> {
        self.batches.lock().clone()
    }

    /// Number of records across all accepted batches.
    pub fn submitted_count(&self) -> usize {
        self.batches.lock().iter().map(Vec::len).sum()
    }

    pub fn known(&self) -> HashSet<String> {
        self.known.lock().clone()
    }

    /// Number of known-id lookups, including failed ones.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Ledger for RecordingLedger {
    async fn known_external_ids(&self) -> Result<HashSet<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.lookup_failure.lock().clone() {
            return Err(Error::Ledger(reason));
        }
        Ok(self.known.lock().clone())
    }

    async fn submit(&self, records: &[Record]) -> Result<()> {
        if let Some(reason) = self.submit_failure.lock().clone() {
            return Err(Error::Ledger(reason));
        }
        self.known.lock().extend(
            records
                .iter()
                .filter_map(|r| r.external_id().map(ToString::to_string)),
        );
        self.batches.lock().push(records.to_vec());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
