//! Runtime entrypoints used by the CLI.

use tokio::sync::watch;
use tracing::info;

use super::orchestrator::Orchestrator;
use crate::application::CycleOutcome;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_orchestrator;
use crate::infrastructure::config::Config;

impl Orchestrator {
    /// Build from config and poll until `shutdown` is signalled.
    pub async fn run(config: &Config, shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(dry_run = config.dry_run, "Starting ledgerbridge");
        let mut orchestrator = build_orchestrator(config)?;
        orchestrator.run_with_shutdown(shutdown).await;
        Ok(())
    }

    /// Build from config and run exactly one cycle.
    pub async fn run_single(config: &Config) -> Result<CycleOutcome> {
        let mut orchestrator = build_orchestrator(config)?;
        Ok(orchestrator.run_once().await)
    }
}
