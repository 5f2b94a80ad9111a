use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A config file inside a temporary directory that lives as long as the value.
pub struct TempConfig {
    dir: TempDir,
    path: PathBuf,
}

impl TempConfig {
    pub fn new(contents: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("write temp config");
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

pub const VALID_CONFIG: &str = r#"
dry_run = false

[binance]
api_url = "https://api.binance.com"
recv_window_ms = 5000

[ledger]
base_url = "https://ledger.example.com"
records_path = "/api/records"
bulk_path = "/api/records/bulk"

[poll]
interval_secs = 60
watermark_policy = "confirmed"

[logging]
level = "warn"
format = "pretty"
"#;
