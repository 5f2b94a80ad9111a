//! JSON file checkpoint.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Watermark;
use crate::error::Result;
use crate::port::outbound::checkpoint::WatermarkStore;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Checkpoint {
    watermark: Watermark,
    updated_at: DateTime<Utc>,
}

/// Stores the watermark as a small JSON document.
///
/// ```json
/// {"watermark": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:01:00Z"}
/// ```
#[derive(Debug, Clone)]
pub struct FileWatermarkStore {
    path: PathBuf,
}

impl FileWatermarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WatermarkStore for FileWatermarkStore {
    fn load(&self) -> Result<Option<Watermark>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let checkpoint: Checkpoint = serde_json::from_str(&contents)?;
        Ok(Some(checkpoint.watermark))
    }

    /// Write-to-temp-then-rename so a crash never leaves a torn file.
    fn save(&self, watermark: Watermark) -> Result<()> {
        let json = serde_json::to_string_pretty(&Checkpoint {
            watermark,
            updated_at: Utc::now(),
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }
}
