//! Source-level checks for the layer rules of the crate.
//!
//! The whole `src/` tree is read once into a [`SourceTree`]; each rule is a
//! query over its lines.

use std::fs;
use std::path::{Path, PathBuf};

/// A source line that broke a rule: `(file, line number, text)`.
pub type Hit = (String, usize, String);

/// The hexagonal layers and what each may not depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Domain,
    Port,
    Application,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Domain, Layer::Port, Layer::Application];

    pub fn dir(self) -> &'static str {
        match self {
            Layer::Domain => "src/domain/",
            Layer::Port => "src/port/",
            Layer::Application => "src/application/",
        }
    }

    /// Paths a file in this layer must never mention.
    pub fn forbidden(self) -> &'static [&'static str] {
        match self {
            Layer::Domain => &[
                "crate::adapter",
                "crate::infrastructure",
                "crate::application",
                "crate::port",
                "tokio::",
                "reqwest::",
                "tracing::",
            ],
            Layer::Port => &["crate::adapter", "crate::application", "crate::infrastructure"],
            Layer::Application => &["crate::adapter::", "crate::infrastructure::", "reqwest::"],
        }
    }
}

struct SourceFile {
    path: String,
    content: String,
}

/// Every `.rs` file under `src/`, keyed by its path relative to the crate.
pub struct SourceTree {
    files: Vec<SourceFile>,
}

impl SourceTree {
    pub fn load() -> Self {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let mut paths = Vec::new();
        walk(&root.join("src"), &mut paths);
        paths.sort();

        let files = paths
            .into_iter()
            .map(|path| SourceFile {
                content: fs::read_to_string(&path)
                    .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display())),
                path: path
                    .strip_prefix(&root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/"),
            })
            .collect();
        Self { files }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    /// Lines under `prefix` that mention any of `patterns`.
    pub fn lines_mentioning(&self, prefix: &str, patterns: &[&str]) -> Vec<Hit> {
        self.files
            .iter()
            .filter(|f| f.path.starts_with(prefix))
            .flat_map(|f| {
                f.content.lines().enumerate().filter_map(move |(idx, line)| {
                    patterns
                        .iter()
                        .any(|p| line.contains(p))
                        .then(|| (f.path.clone(), idx + 1, line.to_string()))
                })
            })
            .collect()
    }

    /// Imports that cross a layer boundary the wrong way.
    pub fn layer_violations(&self, layer: Layer) -> Vec<Hit> {
        self.lines_mentioning(layer.dir(), layer.forbidden())
    }

    /// Uses of `patterns` anywhere except `owner`.
    pub fn confined_to(&self, owner: &str, patterns: &[&str]) -> Vec<Hit> {
        self.lines_mentioning("src/", patterns)
            .into_iter()
            .filter(|(path, _, _)| path != owner)
            .collect()
    }

    /// `mod.rs` lines that are not module declarations, re-exports,
    /// attributes or comments.
    pub fn mod_rs_bodies(&self) -> Vec<Hit> {
        self.files
            .iter()
            .filter(|f| f.path.ends_with("/mod.rs"))
            .flat_map(|f| {
                f.content.lines().enumerate().filter_map(move |(idx, raw)| {
                    let line = raw.trim();
                    let allowed = line.is_empty()
                        || line.starts_with("//")
                        || line.starts_with("#[")
                        || line.starts_with("mod ")
                        || line.starts_with("pub mod ")
                        || line.starts_with("pub use ");
                    (!allowed).then(|| (f.path.clone(), idx + 1, raw.to_string()))
                })
            })
            .collect()
    }
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries =
        fs::read_dir(dir).unwrap_or_else(|e| panic!("failed to read dir {}: {e}", dir.display()));
    for entry in entries {
        let path = entry
            .unwrap_or_else(|e| panic!("failed to read dir entry: {e}"))
            .path();
        if path.is_dir() {
            walk(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}
