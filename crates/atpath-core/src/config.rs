use crate::error::ConfigError;
use crate::repo_root::RepoLayout;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MARKER: &str = "_repos";
pub const DEFAULT_SUGGESTION_LIMIT: usize = 50;

/// Settings shared by the library and the CLI host.
///
/// Loaded from a TOML file such as:
///
/// ```toml
/// marker = "_repos"
/// suggestion_limit = 50
/// document_extensions = ["md"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path segment whose following segment names a repository.
    pub marker: String,
    /// Maximum number of autocomplete suggestions returned.
    pub suggestion_limit: usize,
    /// Extensions (without the dot) of documents whose references are rewritten.
    pub document_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            document_extensions: vec!["md".to_string()],
        }
    }
}

impl Config {
    /// Load config from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.marker.is_empty() || self.marker.contains('/') {
            return Err(ConfigError::InvalidMarker(self.marker.clone()));
        }
        Ok(())
    }

    pub fn layout(&self) -> RepoLayout {
        RepoLayout::new(&self.marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_plugin_behavior() {
        let config = Config::default();
        assert_eq!(config.marker, "_repos");
        assert_eq!(config.suggestion_limit, 50);
        assert_eq!(config.document_extensions, vec!["md"]);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = Config::from_toml_str("suggestion_limit = 10").unwrap();
        assert_eq!(config.suggestion_limit, 10);
        assert_eq!(config.marker, "_repos");
    }

    #[test]
    fn rejects_marker_with_separator() {
        let err = Config::from_toml_str("marker = \"a/b\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMarker(_)));
    }

    #[test]
    fn parse_error_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "suggestion_limit = \"lots\"").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }
}
