//! Handler for the `run` command.

use std::path::Path;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::orchestration::Orchestrator;

/// Poll until Ctrl-C. A cycle in flight finishes before the process exits.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Ledger", &config.ledger.base_url);
    output::field("Interval", format!("{} s", config.poll.interval_secs));
    output::field("Policy", config.poll.watermark_policy);
    if config.dry_run {
        output::warning("Dry-run mode enabled - records will be logged, not submitted");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, finishing current cycle"),
            Err(e) => error!(error = %e, "Failed to listen for Ctrl-C"),
        }
        let _ = shutdown_tx.send(true);
    });

    Orchestrator::run(&config, shutdown_rx).await
}
