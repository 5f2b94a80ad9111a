//! In-memory checkpoint, used when no checkpoint file is configured.

use parking_lot::Mutex;

use crate::domain::Watermark;
use crate::error::Result;
use crate::port::outbound::checkpoint::WatermarkStore;

/// Keeps the watermark for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryWatermarkStore {
    saved: Mutex<Option<Watermark>>,
}

impl MemoryWatermarkStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously saved watermark.
    #[must_use]
    pub fn with_saved(watermark: Watermark) -> Self {
        Self {
            saved: Mutex::new(Some(watermark)),
        }
    }
}

impl WatermarkStore for MemoryWatermarkStore {
    fn load(&self) -> Result<Option<Watermark>> {
        Ok(*self.saved.lock())
    }

    fn save(&self, watermark: Watermark) -> Result<()> {
        *self.saved.lock() = Some(watermark);
        Ok(())
    }
}
