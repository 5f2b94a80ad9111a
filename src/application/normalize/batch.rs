//! Batch normalization.

use tracing::warn;

use crate::domain::{NormalizeError, Record};

/// Normalize a batch, skipping transactions that fail.
///
/// Upstream order is preserved for the records that succeed.
pub fn normalize_all<T>(
    raws: impl IntoIterator<Item = T>,
    normalize: impl Fn(&T) -> Result<Record, NormalizeError>,
) -> Vec<Record> {
    raws.into_iter()
        .filter_map(|raw| match normalize(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    kind = %e.kind(),
                    transaction_id = %e.transaction_id(),
                    error = %e,
                    "Skipping transaction that failed normalization"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::normalize::{normalize_deposit, normalize_pay_transaction};
    use crate::testkit::domain::{deposit, pay_transaction};

    #[test]
    fn normalize_all_skips_failures_and_keeps_order() {
        let raws = vec![
            deposit("tx-1", "USDT", "1.00", 1_000),
            deposit("tx-2", "USDT", "not-a-number", 2_000),
            deposit("tx-3", "BTC", "0.5", 3_000),
        ];

        let records = normalize_all(raws, normalize_deposit);
        let ids: Vec<_> = records
            .iter()
            .filter_map(|r| r.external_id())
            .map(|id| id.as_str())
            .collect();

        assert_eq!(ids, vec!["BN-tx-1", "BN-tx-3"]);
    }

    #[test]
    fn zero_pay_amount_does_not_abort_batch() {
        let raws = vec![
            pay_transaction("1", "0", "USDT", 1_000),
            pay_transaction("2", "-3.50", "USDT", 2_000),
        ];

        let records = normalize_all(raws, normalize_pay_transaction);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount().get(), 350);
    }
}
