use crate::corpus::{Corpus, EntryKind};
use crate::error::{CorpusError, RewriteError};
use crate::link_parser::{apply_edits, RenamePattern};
use crate::repo_root::{to_relative, RepoLayout};

// ---------------------------------------------------------------------------
// Rename events
// ---------------------------------------------------------------------------

/// A file or folder moved from `old_path` to `new_path`.
///
/// Folder moves are delivered once for the folder itself; references to its
/// descendants are covered by the folder's `@old/` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEvent {
    pub old_path: String,
    pub new_path: String,
    pub is_folder: bool,
}

impl RenameEvent {
    pub fn new(old_path: &str, new_path: &str, is_folder: bool) -> Self {
        Self {
            old_path: old_path.to_string(),
            new_path: new_path.to_string(),
            is_folder,
        }
    }

    pub fn file(old_path: &str, new_path: &str) -> Self {
        Self::new(old_path, new_path, false)
    }

    pub fn folder(old_path: &str, new_path: &str) -> Self {
        Self::new(old_path, new_path, true)
    }

    /// Build an event from a host rename notification, after the move happened.
    ///
    /// The entry counts as a folder when the corpus says so, or when its new
    /// path contains no `.` at all.
    pub fn from_host(corpus: &dyn Corpus, new_path: &str, old_path: &str) -> Self {
        let is_folder =
            corpus.entry_kind(new_path) == Some(EntryKind::Folder) || !new_path.contains('.');
        Self::new(old_path, new_path, is_folder)
    }

    pub fn kind(&self) -> EntryKind {
        if self.is_folder {
            EntryKind::Folder
        } else {
            EntryKind::File
        }
    }
}

// ---------------------------------------------------------------------------
// Propagation
// ---------------------------------------------------------------------------

/// A document that could not be updated. Propagation continued without it.
#[derive(Debug)]
pub struct DocumentFailure {
    pub path: String,
    pub error: RewriteError,
}

/// Outcome of [`propagate`].
#[derive(Debug, Default)]
pub struct PropagationReport {
    /// Documents rewritten by the repository-relative pass
    pub relative_documents: Vec<String>,
    /// Documents rewritten by the full-path pass
    pub absolute_documents: Vec<String>,
    /// Total references replaced across both passes
    pub references_rewritten: usize,
    pub failures: Vec<DocumentFailure>,
}

impl PropagationReport {
    /// Number of distinct documents written.
    pub fn documents_rewritten(&self) -> usize {
        let mut all: Vec<&String> = self
            .relative_documents
            .iter()
            .chain(self.absolute_documents.iter())
            .collect();
        all.sort();
        all.dedup();
        all.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Clone, Copy)]
enum Pass {
    Relative,
    Absolute,
}

/// Rewrite every stale reference after `event`.
///
/// Two independent passes run over the corpus documents:
/// 1. Repository-relative references (`@src/a.md`), when the relative path
///    changed. Only documents inside the old repository are scanned, or only
///    documents outside every repository when the old path had no repository.
/// 2. Full-path references (`@_repos/proj/src/a.md`), when the old path was
///    inside a repository and the path changed. Only documents outside that
///    repository are scanned.
///
/// A document is written only if its content changed. Failing to read or write
/// one document is recorded in the report and does not stop the others.
/// Only a failure to list the corpus is returned as an error.
pub fn propagate(
    corpus: &mut dyn Corpus,
    layout: &RepoLayout,
    event: &RenameEvent,
) -> Result<PropagationReport, CorpusError> {
    let old_root = layout.locate_root(&event.old_path);
    let new_root = layout.locate_root(&event.new_path);
    let old_rel = to_relative(&event.old_path, old_root);
    let new_rel = to_relative(&event.new_path, new_root);

    let documents = corpus.documents()?;
    let mut report = PropagationReport::default();

    // Pass 1: repository-relative references
    if old_rel != new_rel {
        match RenamePattern::new(old_rel, new_rel, event.kind()) {
            Ok(pattern) => {
                for doc in &documents {
                    let in_scope = match old_root {
                        Some(root) => RepoLayout::is_inside(doc, root),
                        None => layout.locate_root(doc).is_none(),
                    };
                    if in_scope {
                        rewrite_document(corpus, doc, &pattern, Pass::Relative, &mut report);
                    }
                }
            }
            Err(e) => report.failures.push(DocumentFailure {
                path: event.old_path.clone(),
                error: e.into(),
            }),
        }
    }

    // Pass 2: full-path references from outside the old repository
    if let Some(old_root) = old_root {
        if event.old_path != event.new_path {
            match RenamePattern::new(&event.old_path, &event.new_path, event.kind()) {
                Ok(pattern) => {
                    for doc in &documents {
                        if layout.locate_root(doc) == Some(old_root) {
                            continue;
                        }
                        rewrite_document(corpus, doc, &pattern, Pass::Absolute, &mut report);
                    }
                }
                Err(e) => report.failures.push(DocumentFailure {
                    path: event.old_path.clone(),
                    error: e.into(),
                }),
            }
        }
    }

    tracing::info!(
        "Rename {} -> {}: {} references rewritten in {} documents, {} failures",
        event.old_path,
        event.new_path,
        report.references_rewritten,
        report.documents_rewritten(),
        report.failures.len()
    );

    Ok(report)
}

/// Read one document, apply the pattern's edits and write it back if changed.
fn rewrite_document(
    corpus: &mut dyn Corpus,
    doc: &str,
    pattern: &RenamePattern,
    pass: Pass,
    report: &mut PropagationReport,
) {
    let content = match corpus.read(doc) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read {} during rename propagation: {}", doc, e);
            report.failures.push(DocumentFailure {
                path: doc.to_string(),
                error: e.into(),
            });
            return;
        }
    };

    let edits = pattern.edits(&content);
    if edits.is_empty() {
        return;
    }
    let updated = apply_edits(&content, &edits);
    if updated == content {
        return;
    }

    if let Err(e) = corpus.write(doc, &updated) {
        tracing::warn!("Failed to update references in {}: {}", doc, e);
        report.failures.push(DocumentFailure {
            path: doc.to_string(),
            error: e.into(),
        });
        return;
    }

    tracing::debug!("Rewrote {} references in {}", edits.len(), doc);
    report.references_rewritten += edits.len();
    match pass {
        Pass::Relative => report.relative_documents.push(doc.to_string()),
        Pass::Absolute => report.absolute_documents.push(doc.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::MemoryCorpus;

    fn layout() -> RepoLayout {
        RepoLayout::default()
    }

    fn contents(corpus: &MemoryCorpus, path: &str) -> String {
        corpus.contents(path).unwrap().to_string()
    }

    // === RenameEvent ===

    #[test]
    fn from_host_detects_folder_from_corpus() {
        let corpus = MemoryCorpus::from_files(&[("_repos/p/lib.v2/a.ts", "")]);
        let event = RenameEvent::from_host(&corpus, "_repos/p/lib.v2", "_repos/p/src");
        assert!(event.is_folder);
        assert_eq!(event.old_path, "_repos/p/src");
        assert_eq!(event.new_path, "_repos/p/lib.v2");
    }

    #[test]
    fn from_host_treats_dotless_path_as_folder() {
        let corpus = MemoryCorpus::new();
        assert!(RenameEvent::from_host(&corpus, "notes/archive", "notes/old").is_folder);
        assert!(!RenameEvent::from_host(&corpus, "notes/b.md", "notes/a.md").is_folder);
    }

    // === Pass 1: repository-relative ===

    #[test]
    fn file_rename_inside_repository() {
        let mut corpus = MemoryCorpus::from_files(&[
            ("_repos/notes/b.md", ""),
            ("_repos/notes/index.md", "@a.md.bak stays, @a.md moves"),
        ]);
        let report = propagate(
            &mut corpus,
            &layout(),
            &RenameEvent::file("_repos/notes/a.md", "_repos/notes/b.md"),
        )
        .unwrap();
        assert_eq!(
            contents(&corpus, "_repos/notes/index.md"),
            "@a.md.bak stays, @b.md moves"
        );
        assert_eq!(report.relative_documents, vec!["_repos/notes/index.md"]);
        assert_eq!(report.references_rewritten, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn file_rename_outside_any_repository() {
        let mut corpus = MemoryCorpus::from_files(&[
            ("notes/b.md", ""),
            ("index.md", "see @notes/a.md.bak and @notes/a.md here"),
            ("_repos/p/doc.md", "@notes/a.md"),
        ]);
        let report = propagate(
            &mut corpus,
            &layout(),
            &RenameEvent::file("notes/a.md", "notes/b.md"),
        )
        .unwrap();
        assert_eq!(
            contents(&corpus, "index.md"),
            "see @notes/a.md.bak and @notes/b.md here"
        );
        // Repository documents are never rewritten by a global rename.
        assert_eq!(contents(&corpus, "_repos/p/doc.md"), "@notes/a.md");
        assert_eq!(corpus.written_paths(), ["index.md"]);
        assert!(report.absolute_documents.is_empty());
    }

    #[test]
    fn relative_pass_ignores_other_repositories() {
        let mut corpus = MemoryCorpus::from_files(&[
            ("_repos/one/doc.md", "@a.md"),
            ("_repos/two/doc.md", "@a.md"),
        ]);
        propagate(
            &mut corpus,
            &layout(),
            &RenameEvent::file("_repos/one/a.md", "_repos/one/b.md"),
        )
        .unwrap();
        assert_eq!(contents(&corpus, "_repos/one/doc.md"), "@b.md");
        assert_eq!(contents(&corpus, "_repos/two/doc.md"), "@a.md");
    }

    // === Folder rename across both passes ===

    #[test]
    fn folder_rename_rewrites_both_scopes() {
        let mut corpus = MemoryCorpus::from_files(&[
            ("_repos/proj/lib/util.ts", "export {}"),
            (
                "_repos/proj/README.md",
                "Uses @src/util.ts and (@src/deep/x.ts); literal @_repos/proj/src/util.ts",
            ),
            (
                "index.md",
                "Global @_repos/proj/src/util.ts; relative-looking @src/util.ts",
            ),
            ("_repos/other/doc.md", "@_repos/proj/src/util.ts @src/util.ts"),
        ]);
        let report = propagate(
            &mut corpus,
            &layout(),
            &RenameEvent::folder("_repos/proj/src", "_repos/proj/lib"),
        )
        .unwrap();

        assert_eq!(
            contents(&corpus, "_repos/proj/README.md"),
            "Uses @lib/util.ts and (@lib/deep/x.ts); literal @_repos/proj/src/util.ts"
        );
        assert_eq!(
            contents(&corpus, "index.md"),
            "Global @_repos/proj/lib/util.ts; relative-looking @src/util.ts"
        );
        assert_eq!(
            contents(&corpus, "_repos/other/doc.md"),
            "@_repos/proj/lib/util.ts @src/util.ts"
        );
        assert_eq!(report.relative_documents, vec!["_repos/proj/README.md"]);
        assert_eq!(
            report.absolute_documents,
            vec!["index.md", "_repos/other/doc.md"]
        );
        assert_eq!(report.references_rewritten, 4);
        assert_eq!(report.documents_rewritten(), 3);
    }

    #[test]
    fn cross_repository_move_only_rewrites_full_paths() {
        // Same relative path in both repositories: only the full-path pass runs.
        let mut corpus = MemoryCorpus::from_files(&[
            ("_repos/a/doc.md", "@x.md"),
            ("_repos/b/doc.md", "@_repos/a/x.md"),
        ]);
        let report = propagate(
            &mut corpus,
            &layout(),
            &RenameEvent::file("_repos/a/x.md", "_repos/b/x.md"),
        )
        .unwrap();
        assert_eq!(contents(&corpus, "_repos/a/doc.md"), "@x.md");
        assert_eq!(contents(&corpus, "_repos/b/doc.md"), "@_repos/b/x.md");
        assert!(report.relative_documents.is_empty());
    }

    // === Write suppression ===

    #[test]
    fn untouched_documents_are_never_written() {
        let mut corpus = MemoryCorpus::from_files(&[
            ("_repos/proj/a.md", "no references here"),
            ("_repos/proj/b.md", "@other.md and x@a.md"),
            ("index.md", "@_repos/proj/other.md"),
        ]);
        let report = propagate(
            &mut corpus,
            &layout(),
            &RenameEvent::file("_repos/proj/a.md", "_repos/proj/c.md"),
        )
        .unwrap();
        assert_eq!(corpus.write_count(), 0);
        assert_eq!(report.documents_rewritten(), 0);
    }

    #[test]
    fn identical_paths_do_nothing() {
        let mut corpus = MemoryCorpus::from_files(&[("_repos/p/doc.md", "@a.md")]);
        propagate(
            &mut corpus,
            &layout(),
            &RenameEvent::file("_repos/p/a.md", "_repos/p/a.md"),
        )
        .unwrap();
        assert_eq!(corpus.write_count(), 0);
    }

    #[test]
    fn only_documents_are_rewritten() {
        let mut corpus = MemoryCorpus::from_files(&[
            ("_repos/p/script.ts", "// @a.md"),
            ("_repos/p/doc.md", "@a.md"),
        ]);
        propagate(
            &mut corpus,
            &layout(),
            &RenameEvent::file("_repos/p/a.md", "_repos/p/b.md"),
        )
        .unwrap();
        assert_eq!(contents(&corpus, "_repos/p/script.ts"), "// @a.md");
        assert_eq!(corpus.written_paths(), ["_repos/p/doc.md"]);
    }

    // === Failure handling ===

    #[test]
    fn failing_documents_do_not_stop_propagation() {
        let mut corpus = MemoryCorpus::from_files(&[
            ("_repos/p/one.md", "@a.md"),
            ("_repos/p/two.md", "@a.md"),
            ("_repos/p/three.md", "@a.md"),
        ]);
        corpus.deny_read("_repos/p/one.md");
        corpus.deny_write("_repos/p/two.md");

        let report = propagate(
            &mut corpus,
            &layout(),
            &RenameEvent::file("_repos/p/a.md", "_repos/p/b.md"),
        )
        .unwrap();

        assert_eq!(contents(&corpus, "_repos/p/three.md"), "@b.md");
        assert_eq!(contents(&corpus, "_repos/p/two.md"), "@a.md");
        let failed: Vec<&str> = report.failures.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(failed, vec!["_repos/p/one.md", "_repos/p/two.md"]);
        assert!(matches!(
            report.failures[0].error,
            RewriteError::Corpus(CorpusError::Read { .. })
        ));
        assert_eq!(report.relative_documents, vec!["_repos/p/three.md"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn custom_marker_scopes_repositories() {
        let layout = RepoLayout::new("projects");
        let mut corpus = MemoryCorpus::from_files(&[
            ("projects/web/README.md", "@app.md"),
            ("journal.md", "@projects/web/app.md"),
        ]);
        propagate(
            &mut corpus,
            &layout,
            &RenameEvent::file("projects/web/app.md", "projects/web/main.md"),
        )
        .unwrap();
        assert_eq!(contents(&corpus, "projects/web/README.md"), "@main.md");
        assert_eq!(contents(&corpus, "journal.md"), "@projects/web/main.md");
    }
}
