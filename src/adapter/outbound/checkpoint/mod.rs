//! Watermark checkpoint adapters.

mod file;
mod memory;

pub use file::FileWatermarkStore;
pub use memory::MemoryWatermarkStore;
