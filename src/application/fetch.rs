//! Fetchers: one per upstream kind.
//!
//! Each fetcher asks the [`TransactionSource`] for transactions at or after
//! the watermark, normalizes them, and drops anything dated before the
//! window. A collaborator failure is logged and yields an empty result so the
//! other kinds still go through.

use chrono::{DateTime, Utc};
use tracing::{debug, error};

use super::normalize::{
    normalize_all, normalize_deposit, normalize_p2p_order, normalize_pay_transaction,
};
use crate::domain::{NormalizeError, Record, TransactionKind, Watermark};
use crate::error::Result;
use crate::port::TransactionSource;

/// Normalized output of one fetcher for one cycle.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub kind: TransactionKind,
    /// Records in upstream order.
    pub records: Vec<Record>,
    /// The collaborator call failed; `records` is empty.
    pub failed: bool,
}

impl Fetched {
    fn failed(kind: TransactionKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
            failed: true,
        }
    }
}

/// Fetch and normalize P2P orders.
///
/// Every order is normalized whatever its status.
pub async fn fetch_p2p(source: &dyn TransactionSource, watermark: Watermark) -> Fetched {
    let since = watermark.since();
    let result = source.p2p_orders(since).await;
    collect(TransactionKind::P2p, since, result, normalize_p2p_order)
}

/// Fetch and normalize Pay transfers.
pub async fn fetch_pay(source: &dyn TransactionSource, watermark: Watermark) -> Fetched {
    let since = watermark.since();
    let result = source.pay_transactions(since).await;
    collect(TransactionKind::Pay, since, result, normalize_pay_transaction)
}

/// Fetch and normalize deposits.
pub async fn fetch_deposits(source: &dyn TransactionSource, watermark: Watermark) -> Fetched {
    let since = watermark.since();
    let result = source.deposits(since).await;
    collect(TransactionKind::Deposit, since, result, normalize_deposit)
}

/// Run all three fetchers concurrently.
///
/// Results are returned in [`TransactionKind::ALL`] order.
pub async fn fetch_all(source: &dyn TransactionSource, watermark: Watermark) -> Vec<Fetched> {
    let (p2p, pay, deposits) = tokio::join!(
        fetch_p2p(source, watermark),
        fetch_pay(source, watermark),
        fetch_deposits(source, watermark),
    );
    vec![p2p, pay, deposits]
}

fn collect<T>(
    kind: TransactionKind,
    since: Option<DateTime<Utc>>,
    result: Result<Vec<T>>,
    normalize: impl Fn(&T) -> std::result::Result<Record, NormalizeError>,
) -> Fetched {
    let raws = match result {
        Ok(raws) => raws,
        Err(e) => {
            error!(kind = %kind, error = %e, "Upstream fetch failed, skipping kind this cycle");
            return Fetched::failed(kind);
        }
    };

    let fetched = raws.len();
    let mut records = normalize_all(raws, normalize);
    if let Some(since) = since {
        records.retain(|record| record.date() >= since);
    }

    debug!(
        kind = %kind,
        fetched,
        records = records.len(),
        "Fetched transactions"
    );

    Fetched {
        kind,
        records,
        failed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{deposit, p2p_order, pay_transaction};
    use crate::testkit::exchange::ScriptedSource;
    use chrono::TimeZone;

    fn ids(fetched: &Fetched) -> Vec<String> {
        fetched
            .records
            .iter()
            .filter_map(|r| r.external_id().map(ToString::to_string))
            .collect()
    }

    #[tokio::test]
    async fn first_cycle_fetches_without_bound() {
        let source = ScriptedSource::new().with_deposits(vec![deposit("a", "USDT", "1", 1_000)]);

        let fetched = fetch_deposits(&source, Watermark::empty()).await;

        assert_eq!(ids(&fetched), vec!["BN-a"]);
        assert_eq!(source.calls().deposits, vec![None]);
    }

    #[tokio::test]
    async fn bound_is_passed_and_applied_client_side() {
        let since = Utc.timestamp_millis_opt(5_000).unwrap();
        let source = ScriptedSource::new().with_pay(vec![
            pay_transaction("old", "1", "USDT", 4_999),
            pay_transaction("edge", "1", "USDT", 5_000),
            pay_transaction("new", "1", "USDT", 6_000),
        ]);

        let fetched = fetch_pay(&source, Watermark::at(since)).await;

        assert_eq!(ids(&fetched), vec!["PAY-edge", "PAY-new"]);
        assert_eq!(source.calls().pay, vec![Some(since)]);
    }

    #[tokio::test]
    async fn p2p_orders_are_normalized_whatever_their_status() {
        let mut trading = p2p_order("2", "BUY", "1", 1_000);
        trading.order_status = Some("TRADING".into());
        let mut completed = p2p_order("3", "SELL", "1", 1_000);
        completed.order_status = Some("COMPLETED".into());

        let source = ScriptedSource::new().with_p2p(vec![
            p2p_order("1", "BUY", "1", 1_000),
            trading,
            completed,
        ]);

        let fetched = fetch_p2p(&source, Watermark::empty()).await;

        assert_eq!(ids(&fetched), vec!["BN-1", "BN-2", "BN-3"]);
    }

    #[tokio::test]
    async fn failure_yields_empty_result() {
        let source = ScriptedSource::new()
            .with_deposits(vec![deposit("a", "USDT", "1", 1_000)])
            .fail_p2p("timeout");

        let results = fetch_all(&source, Watermark::empty()).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].kind, TransactionKind::P2p);
        assert!(results[0].failed);
        assert!(results[0].records.is_empty());
        assert!(!results[2].failed);
        assert_eq!(ids(&results[2]), vec!["BN-a"]);
    }
}
