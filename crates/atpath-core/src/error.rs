use thiserror::Error;

/// Errors surfaced by a [`Corpus`](crate::corpus::Corpus) implementation.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {root}: {source}")]
    Walk {
        root: String,
        #[source]
        source: walkdir::Error,
    },
}

/// Errors from loading a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid marker segment {0:?}: must be non-empty and contain no '/'")]
    InvalidMarker(String),
}

/// Why one document could not be updated during rename propagation.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("cannot build reference pattern: {0}")]
    Pattern(#[from] regex::Error),
}
