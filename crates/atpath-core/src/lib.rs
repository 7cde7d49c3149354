pub mod config;
pub mod corpus;
pub mod doc_resolver;
pub mod error;
pub mod link_parser;
pub mod rename;
pub mod repo_root;
pub mod suggest;

pub use config::Config;
pub use corpus::{Corpus, EntryKind, FsCorpus, MemoryCorpus};
pub use doc_resolver::{backlinks, forward_links, navigate, resolve_target};
pub use error::{ConfigError, CorpusError, RewriteError};
pub use link_parser::{find_references, ReferenceSpan};
pub use rename::{propagate, PropagationReport, RenameEvent};
pub use repo_root::{locate_root, to_relative, RepoLayout};
pub use suggest::{detect_trigger, suggest, SuggestTrigger, Suggestion};
