//! Polling loop configuration.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::application::WatermarkPolicy;
use crate::domain::Watermark;

/// How often to poll and where the fetch window starts.
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Delay between the end of one cycle and the start of the next.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Lower bound for the very first fetch. Unset means full history.
    #[serde(default)]
    pub initial_watermark: Option<DateTime<Utc>>,
    #[serde(default)]
    pub watermark_policy: WatermarkPolicy,
    /// Persist the watermark here between runs. Unset keeps it in memory.
    #[serde(default)]
    pub checkpoint_file: Option<PathBuf>,
}

const fn default_interval_secs() -> u64 {
    60
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            initial_watermark: None,
            watermark_policy: WatermarkPolicy::default(),
            checkpoint_file: None,
        }
    }
}

impl PollConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Watermark to start from when no checkpoint exists.
    #[must_use]
    pub fn initial_watermark(&self) -> Watermark {
        Watermark::from(self.initial_watermark)
    }
}
