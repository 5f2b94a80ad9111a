//! One polling cycle: fetch → normalize → dedupe → submit → advance watermark.
//!
//! The watermark is passed in and the next one is returned in the
//! [`CycleOutcome`]; the pipeline itself holds no cross-cycle state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::dedup::filter_known;
use super::fetch::fetch_all;
use super::submit::{submit, Submission, ALERT_TARGET};
use crate::domain::watermark::latest_date;
use crate::domain::{Record, TransactionKind, Watermark};
use crate::port::{Ledger, TransactionSource};

/// When the watermark may move past records that were fetched this cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkPolicy {
    /// Advance to the latest fetched record regardless of submission outcome.
    #[default]
    Always,
    /// Hold the watermark when submission fails so the window is refetched.
    Confirmed,
}

impl WatermarkPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Confirmed => "confirmed",
        }
    }
}

impl std::fmt::Display for WatermarkPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Watermark the cycle started from.
    pub previous: Watermark,
    /// Watermark for the next cycle.
    pub watermark: Watermark,
    /// Records produced by all fetchers, before deduplication.
    pub fetched: usize,
    /// Latest upstream date among fetched records.
    pub latest: Option<DateTime<Utc>>,
    /// Kinds whose upstream call failed.
    pub failed_kinds: Vec<TransactionKind>,
    /// Candidates dropped as already known.
    pub duplicates: usize,
    /// The known-id lookup failed.
    pub lookup_failed: bool,
    pub submission: Submission,
}

impl CycleOutcome {
    /// Records whose submission failed while the watermark moved past them.
    ///
    /// These will not be fetched again.
    #[must_use]
    pub fn records_lost(&self) -> usize {
        match &self.submission {
            Submission::Failed { count, .. } if self.watermark != self.previous => *count,
            _ => 0,
        }
    }

    #[must_use]
    pub fn watermark_advanced(&self) -> bool {
        self.watermark != self.previous
    }
}

/// The record pipeline wired to its collaborators.
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn TransactionSource>,
    ledger: Arc<dyn Ledger>,
    policy: WatermarkPolicy,
    dry_run: bool,
}

impl Pipeline {
    pub fn new(source: Arc<dyn TransactionSource>, ledger: Arc<dyn Ledger>) -> Self {
        Self {
            source,
            ledger,
            policy: WatermarkPolicy::default(),
            dry_run: false,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: WatermarkPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Log batches instead of submitting them.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn policy(&self) -> WatermarkPolicy {
        self.policy
    }

    /// Run one full cycle starting from `watermark`.
    pub async fn run_cycle(&self, watermark: Watermark) -> CycleOutcome {
        info!(
            exchange = self.source.exchange_name(),
            since = %watermark,
            "Cycle started"
        );

        let fetched = fetch_all(self.source.as_ref(), watermark).await;
        let failed_kinds: Vec<TransactionKind> =
            fetched.iter().filter(|f| f.failed).map(|f| f.kind).collect();
        let records: Vec<Record> = fetched.into_iter().flat_map(|f| f.records).collect();
        let latest = latest_date(&records);
        let advanced = watermark.advance_past(&records);
        let total = records.len();

        // Dedup consumes the batch; the watermark only needs the latest date.
        let deduplicated = filter_known(self.ledger.as_ref(), records).await;
        let submission = submit(self.ledger.as_ref(), &deduplicated.fresh, self.dry_run).await;

        let hold = submission.is_failed() && self.policy == WatermarkPolicy::Confirmed;
        let next = if hold && advanced != watermark {
            warn!(
                since = %watermark,
                "Holding watermark until the failed batch is submitted"
            );
            watermark
        } else {
            advanced
        };

        let outcome = CycleOutcome {
            previous: watermark,
            watermark: next,
            fetched: total,
            latest,
            failed_kinds,
            duplicates: deduplicated.duplicates,
            lookup_failed: deduplicated.lookup_failed,
            submission,
        };

        if outcome.records_lost() > 0 {
            error!(
                target: ALERT_TARGET,
                records = outcome.records_lost(),
                watermark = %outcome.watermark,
                "Watermark advanced past unsubmitted records; they will not be fetched again"
            );
        }

        info!(
            fetched = outcome.fetched,
            duplicates = outcome.duplicates,
            submitted = outcome.submission.submitted(),
            failed_kinds = outcome.failed_kinds.len(),
            watermark = %outcome.watermark,
            "Cycle finished"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{deposit, p2p_order, pay_transaction};
    use crate::testkit::exchange::ScriptedSource;
    use crate::testkit::ledger::RecordingLedger;
    use chrono::TimeZone;

    fn ms(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn pipeline(source: ScriptedSource, ledger: Arc<RecordingLedger>) -> Pipeline {
        Pipeline::new(Arc::new(source), ledger)
    }

    #[tokio::test]
    async fn cycle_submits_all_kinds_and_advances() {
        let source = ScriptedSource::new()
            .with_p2p(vec![p2p_order("1", "BUY", "10", 1_000)])
            .with_pay(vec![pay_transaction("2", "-5", "USDT", 3_000)])
            .with_deposits(vec![deposit("3", "BTC", "0.1", 2_000)]);
        let ledger = Arc::new(RecordingLedger::new());

        let outcome = pipeline(source, Arc::clone(&ledger))
            .run_cycle(Watermark::empty())
            .await;

        assert_eq!(outcome.fetched, 3);
        assert_eq!(outcome.submission, Submission::Submitted { count: 3 });
        assert_eq!(outcome.watermark.since(), Some(ms(3_000)));
        assert_eq!(ledger.batches().len(), 1);
    }

    #[tokio::test]
    async fn no_records_keeps_watermark() {
        let ledger = Arc::new(RecordingLedger::new());
        let start = Watermark::at(ms(10));

        let outcome = pipeline(ScriptedSource::new(), Arc::clone(&ledger))
            .run_cycle(start)
            .await;

        assert_eq!(outcome.watermark, start);
        assert_eq!(outcome.submission, Submission::Skipped);
        assert_eq!(ledger.lookup_count(), 0);
    }

    #[tokio::test]
    async fn failed_submission_at_the_boundary_is_not_held() {
        let start = Watermark::at(ms(2_000));
        let source = ScriptedSource::new().with_deposits(vec![deposit("3", "BTC", "0.1", 2_000)]);
        let ledger = Arc::new(RecordingLedger::new().fail_submit("503"));

        let outcome = pipeline(source, Arc::clone(&ledger))
            .with_policy(WatermarkPolicy::Confirmed)
            .run_cycle(start)
            .await;

        assert!(outcome.submission.is_failed());
        assert_eq!(outcome.watermark, start);
        assert!(!outcome.watermark_advanced());
        assert_eq!(outcome.records_lost(), 0);
    }

    #[tokio::test]
    async fn duplicates_still_advance_watermark() {
        let source = ScriptedSource::new().with_deposits(vec![deposit("3", "BTC", "0.1", 2_000)]);
        let ledger = Arc::new(RecordingLedger::new().with_known(["BN-3"]));

        let outcome = pipeline(source, Arc::clone(&ledger))
            .run_cycle(Watermark::empty())
            .await;

        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.submission, Submission::Skipped);
        assert_eq!(outcome.watermark.since(), Some(ms(2_000)));
        assert!(ledger.batches().is_empty());
    }

    #[tokio::test]
    async fn always_policy_advances_past_failed_submission() {
        let source = ScriptedSource::new().with_deposits(vec![deposit("3", "BTC", "0.1", 2_000)]);
        let ledger = Arc::new(RecordingLedger::new().fail_submit("down"));

        let outcome = pipeline(source, ledger).run_cycle(Watermark::empty()).await;

        assert!(outcome.submission.is_failed());
        assert_eq!(outcome.watermark.since(), Some(ms(2_000)));
        assert_eq!(outcome.records_lost(), 1);
    }

    #[tokio::test]
    async fn confirmed_policy_holds_watermark_on_failure() {
        let source = ScriptedSource::new().with_deposits(vec![deposit("3", "BTC", "0.1", 2_000)]);
        let ledger = Arc::new(RecordingLedger::new().fail_submit("down"));

        let outcome = pipeline(source, ledger)
            .with_policy(WatermarkPolicy::Confirmed)
            .run_cycle(Watermark::empty())
            .await;

        assert!(outcome.submission.is_failed());
        assert!(outcome.watermark.is_empty());
        assert_eq!(outcome.records_lost(), 0);
    }

    #[tokio::test]
    async fn failed_kind_is_reported_and_others_submitted() {
        let source = ScriptedSource::new()
            .fail_pay("reset")
            .with_deposits(vec![deposit("3", "BTC", "0.1", 2_000)]);
        let ledger = Arc::new(RecordingLedger::new());

        let outcome = pipeline(source, Arc::clone(&ledger))
            .run_cycle(Watermark::empty())
            .await;

        assert_eq!(outcome.failed_kinds, vec![TransactionKind::Pay]);
        assert_eq!(outcome.submission.submitted(), 1);
    }
}
