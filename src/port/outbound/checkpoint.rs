//! Watermark checkpoint port.

use crate::domain::Watermark;
use crate::error::Result;

/// Persists the watermark between process runs.
pub trait WatermarkStore: Send + Sync {
    /// Load the last saved watermark; `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<Watermark>>;

    /// Save the watermark, replacing any previous value.
    fn save(&self, watermark: Watermark) -> Result<()>;
}
