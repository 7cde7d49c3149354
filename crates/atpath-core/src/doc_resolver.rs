use crate::corpus::Corpus;
use crate::error::CorpusError;
use crate::link_parser::find_references;
use crate::repo_root::{to_corpus, RepoLayout};

/// Resolve a captured reference path to a corpus path.
///
/// Inside a repository the capture is relative to the repository root; a
/// document outside any repository references by full corpus path. The result
/// may not exist; see [`navigate`].
pub fn resolve_target(layout: &RepoLayout, source_document: &str, captured: &str) -> String {
    to_corpus(captured, layout.locate_root(source_document))
}

/// Like [`resolve_target`], but only returns paths that exist in the corpus.
pub fn navigate(
    corpus: &dyn Corpus,
    layout: &RepoLayout,
    source_document: &str,
    captured: &str,
) -> Option<String> {
    let target = resolve_target(layout, source_document, captured);
    corpus.exists(&target).then_some(target)
}

/// Existing targets referenced from `source_document`, sorted and deduplicated.
pub fn forward_links(
    corpus: &dyn Corpus,
    layout: &RepoLayout,
    source_document: &str,
) -> Result<Vec<String>, CorpusError> {
    let content = corpus.read(source_document)?;
    let mut links: Vec<String> = find_references(&content)
        .map(|r| resolve_target(layout, source_document, &r.path))
        .filter(|target| corpus.exists(target))
        .collect();
    links.sort();
    links.dedup();
    Ok(links)
}

/// Documents with at least one reference resolving to `target`, sorted.
///
/// Documents that cannot be read are logged and skipped.
pub fn backlinks(
    corpus: &dyn Corpus,
    layout: &RepoLayout,
    target: &str,
) -> Result<Vec<String>, CorpusError> {
    let mut sources = Vec::new();
    for doc in corpus.documents()? {
        let content = match corpus.read(&doc) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Skipping {} while collecting backlinks: {}", doc, e);
                continue;
            }
        };
        if find_references(&content).any(|r| resolve_target(layout, &doc, &r.path) == target) {
            sources.push(doc);
        }
    }
    sources.sort();
    Ok(sources)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
