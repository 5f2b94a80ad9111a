//! Polling orchestration.

mod orchestrator;
mod runtime;

pub use orchestrator::{Orchestrator, OrchestratorState};
