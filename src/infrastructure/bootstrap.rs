//! Composition root: turns a [`Config`] into wired collaborators.

use std::sync::Arc;

use tracing::info;

use super::config::Config;
use super::orchestration::Orchestrator;
use crate::adapter::outbound::binance::BinanceClient;
use crate::adapter::outbound::checkpoint::{FileWatermarkStore, MemoryWatermarkStore};
use crate::adapter::outbound::ledger::LedgerClient;
use crate::application::Pipeline;
use crate::error::Result;
use crate::port::{Ledger, TransactionSource, WatermarkStore};

/// Build the Binance-to-ledger pipeline. Fails on missing credentials or an
/// HTTP client that cannot be constructed.
pub fn build_pipeline(config: &Config) -> Result<Pipeline> {
    config.require_credentials()?;

    let source: Arc<dyn TransactionSource> = Arc::new(BinanceClient::from_config(&config.binance)?);
    let ledger: Arc<dyn Ledger> = Arc::new(LedgerClient::from_config(&config.ledger)?);
    info!(
        exchange = source.exchange_name(),
        ledger = ledger.name(),
        dry_run = config.dry_run,
        policy = %config.poll.watermark_policy,
        "Pipeline assembled"
    );

    Ok(Pipeline::new(source, ledger)
        .with_policy(config.poll.watermark_policy)
        .with_dry_run(config.dry_run))
}

/// File-backed store when `poll.checkpoint_file` is set, otherwise in memory.
#[must_use]
pub fn build_watermark_store(config: &Config) -> Arc<dyn WatermarkStore> {
    match &config.poll.checkpoint_file {
        Some(path) => {
            info!(path = %path.display(), "Using watermark checkpoint file");
            Arc::new(FileWatermarkStore::new(path.clone()))
        }
        None => Arc::new(MemoryWatermarkStore::new()),
    }
}

/// Wire the orchestrator, resuming from the checkpoint when one exists.
pub fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let pipeline = build_pipeline(config)?;
    let store = build_watermark_store(config);
    Ok(Orchestrator::resume(
        pipeline,
        store,
        config.poll.interval(),
        config.poll.initial_watermark(),
    ))
}
