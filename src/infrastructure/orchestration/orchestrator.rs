//! Single-worker polling loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::application::{CycleOutcome, Pipeline};
use crate::domain::Watermark;
use crate::port::WatermarkStore;

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    RunningCycle,
}

/// Owns the watermark and drives cycles strictly one after another.
pub struct Orchestrator {
    pipeline: Pipeline,
    store: Arc<dyn WatermarkStore>,
    interval: Duration,
    watermark: Watermark,
    state: OrchestratorState,
    cycles: u64,
}

impl Orchestrator {
    pub fn new(
        pipeline: Pipeline,
        store: Arc<dyn WatermarkStore>,
        interval: Duration,
        watermark: Watermark,
    ) -> Self {
        Self {
            pipeline,
            store,
            interval,
            watermark,
            state: OrchestratorState::Idle,
            cycles: 0,
        }
    }

    /// Start from the saved checkpoint, falling back to `initial` when there
    /// is none or it cannot be read.
    pub fn resume(
        pipeline: Pipeline,
        store: Arc<dyn WatermarkStore>,
        interval: Duration,
        initial: Watermark,
    ) -> Self {
        let watermark = match store.load() {
            Ok(Some(saved)) => {
                info!(watermark = %saved, "Resuming from checkpoint");
                saved
            }
            Ok(None) => initial,
            Err(e) => {
                warn!(error = %e, fallback = %initial, "Failed to read watermark checkpoint");
                initial
            }
        };
        Self::new(pipeline, store, interval, watermark)
    }

    #[must_use]
    pub fn watermark(&self) -> Watermark {
        self.watermark
    }

    #[must_use]
    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// Completed cycles since start.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one cycle to completion and take its watermark.
    pub async fn run_once(&mut self) -> CycleOutcome {
        self.state = OrchestratorState::RunningCycle;
        let outcome = self.pipeline.run_cycle(self.watermark).await;
        self.state = OrchestratorState::Idle;
        self.cycles += 1;

        self.watermark = outcome.watermark;
        if outcome.watermark_advanced() {
            if let Err(e) = self.store.save(self.watermark) {
                warn!(error = %e, watermark = %self.watermark, "Failed to checkpoint watermark");
            }
        }

        outcome
    }

    /// Poll until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// The signal is observed between cycles and while sleeping; a cycle
    /// that has started always runs to completion.
    pub async fn run_with_shutdown(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            watermark = %self.watermark,
            "Polling started"
        );

        loop {
            if *shutdown.borrow() {
                info!("Shutdown signal received");
                break;
            }

            self.run_once().await;
            debug!(cycles = self.cycles, next_in_secs = self.interval.as_secs(), "Sleeping");

            tokio::select! {
                result = shutdown.wait_for(|stop| *stop) => {
                    match result {
                        Ok(_) => info!("Shutdown signal received"),
                        Err(_) => info!("Shutdown channel closed"),
                    }
                    break;
                }
                () = sleep(self.interval) => {}
            }
        }

        info!(cycles = self.cycles, watermark = %self.watermark, "Polling stopped");
    }
}
