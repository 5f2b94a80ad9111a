//! Polling loop: watermark ownership, checkpointing and shutdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::sync::watch;

use ledgerbridge::adapter::outbound::checkpoint::FileWatermarkStore;
use ledgerbridge::application::{Pipeline, WatermarkPolicy};
use ledgerbridge::domain::Watermark;
use ledgerbridge::infrastructure::orchestration::{Orchestrator, OrchestratorState};
use ledgerbridge::port::WatermarkStore;
use ledgerbridge::testkit::domain::deposit;
use ledgerbridge::testkit::exchange::ScriptedSource;
use ledgerbridge::testkit::ledger::RecordingLedger;
use ledgerbridge::testkit::MemoryWatermarkStore;
use tempfile::TempDir;

fn watermark_at(ms: i64) -> Watermark {
    Watermark::at(Utc.timestamp_millis_opt(ms).unwrap())
}

#[tokio::test]
async fn watermark_survives_restart_through_checkpoint_file() {
    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("watermark.json");
    let source = Arc::new(ScriptedSource::new().with_deposits(vec![deposit("a", "BTC", "1", 7_000)]));
    let ledger = Arc::new(RecordingLedger::new());

    let mut first = Orchestrator::resume(
        Pipeline::new(source.clone(), ledger.clone()),
        Arc::new(FileWatermarkStore::new(&checkpoint)),
        Duration::from_secs(60),
        Watermark::empty(),
    );
    first.run_once().await;
    drop(first);

    let second = Orchestrator::resume(
        Pipeline::new(source.clone(), ledger.clone()),
        Arc::new(FileWatermarkStore::new(&checkpoint)),
        Duration::from_secs(60),
        Watermark::empty(),
    );

    assert_eq!(second.watermark(), watermark_at(7_000));
}

#[tokio::test]
async fn initial_watermark_used_without_checkpoint() {
    let source = Arc::new(ScriptedSource::new());
    let ledger = Arc::new(RecordingLedger::new());
    let mut orchestrator = Orchestrator::resume(
        Pipeline::new(source.clone(), ledger),
        Arc::new(MemoryWatermarkStore::new()),
        Duration::from_secs(60),
        watermark_at(1_000),
    );

    orchestrator.run_once().await;

    assert_eq!(source.calls().deposits, vec![watermark_at(1_000).since()]);
}

#[tokio::test]
async fn unreadable_checkpoint_falls_back_to_initial() {
    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("watermark.json");
    std::fs::write(&checkpoint, "{ not json").unwrap();

    let orchestrator = Orchestrator::resume(
        Pipeline::new(Arc::new(ScriptedSource::new()), Arc::new(RecordingLedger::new())),
        Arc::new(FileWatermarkStore::new(&checkpoint)),
        Duration::from_secs(60),
        watermark_at(42),
    );

    assert_eq!(orchestrator.watermark(), watermark_at(42));
}

#[tokio::test]
async fn held_watermark_is_not_checkpointed() {
    let store = Arc::new(MemoryWatermarkStore::new());
    let source = Arc::new(ScriptedSource::new().with_deposits(vec![deposit("a", "BTC", "1", 3_000)]));
    let ledger = Arc::new(RecordingLedger::new().fail_submit("down"));
    let pipeline = Pipeline::new(source, ledger).with_policy(WatermarkPolicy::Confirmed);
    let mut orchestrator =
        Orchestrator::resume(pipeline, store.clone(), Duration::from_secs(60), Watermark::empty());

    let outcome = orchestrator.run_once().await;

    assert!(outcome.submission.is_failed());
    assert!(orchestrator.watermark().is_empty());
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn loop_runs_cycles_until_shutdown() {
    let source = Arc::new(ScriptedSource::new().with_deposits(vec![deposit("a", "BTC", "1", 1_000)]));
    let ledger = Arc::new(RecordingLedger::new());
    let mut orchestrator = Orchestrator::resume(
        Pipeline::new(source.clone(), ledger.clone()),
        Arc::new(MemoryWatermarkStore::new()),
        Duration::from_millis(5),
        Watermark::empty(),
    );
    let (tx, rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        orchestrator.run_with_shutdown(rx).await;
        orchestrator
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(true).unwrap();
    let orchestrator = handle.await.unwrap();

    assert!(orchestrator.cycles() >= 2, "expected repeated cycles");
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
    assert_eq!(ledger.submitted_count(), 1, "later cycles find nothing new");
    assert_eq!(source.calls().deposits.len() as u64, orchestrator.cycles());
}

#[tokio::test]
async fn dropped_sender_stops_the_loop() {
    let mut orchestrator = Orchestrator::resume(
        Pipeline::new(Arc::new(ScriptedSource::new()), Arc::new(RecordingLedger::new())),
        Arc::new(MemoryWatermarkStore::new()),
        Duration::from_secs(3600),
        Watermark::empty(),
    );
    let (tx, rx) = watch::channel(false);
    drop(tx);

    tokio::time::timeout(Duration::from_secs(5), orchestrator.run_with_shutdown(rx))
        .await
        .expect("loop should exit when the shutdown sender is gone");

    assert_eq!(orchestrator.cycles(), 1);
}
