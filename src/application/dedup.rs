//! Deduplication against the downstream ledger.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::domain::Record;
use crate::port::Ledger;

/// Result of filtering a candidate batch.
#[derive(Debug, Clone, Default)]
pub struct Deduplicated {
    /// Records not yet known downstream, in candidate order.
    pub fresh: Vec<Record>,
    /// Candidates dropped as already known (or repeated within the batch).
    pub duplicates: usize,
    /// The known-id query failed and nothing was treated as known.
    pub lookup_failed: bool,
}

/// Drop every candidate whose external id is in `known`.
///
/// Records without an external id are always kept. A second candidate with the
/// same external id as an earlier one in the batch is dropped too.
#[must_use]
pub fn remove_known(candidates: Vec<Record>, known: &HashSet<String>) -> (Vec<Record>, usize) {
    let total = candidates.len();
    let mut seen = HashSet::new();
    let fresh: Vec<Record> = candidates
        .into_iter()
        .filter(|record| match record.external_id() {
            Some(id) => !known.contains(id.as_str()) && seen.insert(id.as_str().to_owned()),
            None => true,
        })
        .collect();
    let duplicates = total - fresh.len();
    (fresh, duplicates)
}

/// Query the ledger for known ids and filter `candidates` against them.
///
/// If the query fails the known set is treated as empty: duplicates may be
/// submitted, but the cycle keeps going.
pub async fn filter_known(ledger: &dyn Ledger, candidates: Vec<Record>) -> Deduplicated {
    if candidates.is_empty() {
        return Deduplicated::default();
    }

    let (known, lookup_failed) = match ledger.known_external_ids().await {
        Ok(known) => (known, false),
        Err(e) => {
            warn!(
                ledger = ledger.name(),
                error = %e,
                "Known-id lookup failed, treating nothing as known"
            );
            (HashSet::new(), true)
        }
    };

    let (fresh, duplicates) = remove_known(candidates, &known);
    debug!(
        known = known.len(),
        fresh = fresh.len(),
        duplicates,
        "Deduplicated batch"
    );

    Deduplicated {
        fresh,
        duplicates,
        lookup_failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::record;
    use crate::testkit::ledger::RecordingLedger;

    fn external_ids(records: &[Record]) -> Vec<&str> {
        records
            .iter()
            .filter_map(|r| r.external_id())
            .map(|id| id.as_str())
            .collect()
    }

    #[test]
    fn removes_known_ids() {
        let known: HashSet<String> = ["BN-1", "PAY-2"].into_iter().map(String::from).collect();
        let candidates = vec![
            record("BN-1", 1_000),
            record("BN-3", 1_000),
            record("PAY-2", 1_000),
        ];

        let (fresh, duplicates) = remove_known(candidates, &known);

        assert_eq!(external_ids(&fresh), vec!["BN-3"]);
        assert_eq!(duplicates, 2);
    }

    #[test]
    fn keeps_records_without_external_id() {
        let anonymous = Record::builder()
            .amount_minor(1u64)
            .direction(crate::domain::Direction::In)
            .currency("USD")
            .description("manual")
            .date_millis(0)
            .build()
            .unwrap();

        let (fresh, duplicates) = remove_known(vec![anonymous], &HashSet::new());

        assert_eq!(fresh.len(), 1);
        assert_eq!(duplicates, 0);
    }

    #[test]
    fn collapses_repeats_within_batch() {
        let candidates = vec![record("BN-1", 1_000), record("BN-1", 2_000)];

        let (fresh, duplicates) = remove_known(candidates, &HashSet::new());

        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].date().timestamp_millis(), 1_000);
        assert_eq!(duplicates, 1);
    }

    #[tokio::test]
    async fn lookup_failure_treats_nothing_as_known() {
        let ledger = RecordingLedger::new()
            .with_known(["BN-1"])
            .fail_lookup("503");

        let result = filter_known(&ledger, vec![record("BN-1", 0), record("BN-2", 0)]).await;

        assert!(result.lookup_failed);
        assert_eq!(result.fresh.len(), 2);
        assert_eq!(result.duplicates, 0);
    }

    #[tokio::test]
    async fn empty_batch_skips_lookup() {
        let ledger = RecordingLedger::new();

        let result = filter_known(&ledger, Vec::new()).await;

        assert!(result.fresh.is_empty());
        assert_eq!(ledger.lookup_count(), 0);
    }
}
