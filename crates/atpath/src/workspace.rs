use anyhow::{Context, Result};
use atpath_core::{Config, FsCorpus, RepoLayout};
use std::path::Path;

/// A notes directory opened as a corpus, with its settings.
pub struct Workspace {
    pub config: Config,
    pub corpus: FsCorpus,
}

impl Workspace {
    pub fn open(dir: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path).context("Failed to load configuration")?;
        if !dir.is_dir() {
            anyhow::bail!("Corpus directory not found: {}", dir.display());
        }
        tracing::debug!(
            "Opened corpus {} (marker {:?}, documents {:?})",
            dir.display(),
            config.marker,
            config.document_extensions
        );
        let corpus = FsCorpus::new(dir, &config.document_extensions);
        Ok(Self { config, corpus })
    }

    pub fn layout(&self) -> RepoLayout {
        self.config.layout()
    }

    /// Normalize a user-supplied path to a corpus path (`/`-separated, no `./`).
    /// Paths climbing out with `..` are refused.
    pub fn corpus_path(&self, raw: &str) -> Result<String> {
        let normalized = raw.replace('\\', "/");
        let segments: Vec<&str> = normalized
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        if segments.contains(&"..") {
            anyhow::bail!("Path escapes the corpus: {}", raw);
        }
        Ok(segments.join("/"))
    }
}
