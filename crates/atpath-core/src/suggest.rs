use crate::corpus::Corpus;
use crate::repo_root::{to_relative, RepoLayout};
use serde::Serialize;

/// A candidate target for an `@` completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Path as it should be written after `@` (repository-relative)
    pub display_path: String,
    /// Corpus path of the suggested file
    pub target_path: String,
}

impl Suggestion {
    /// Text that replaces the trigger range when the suggestion is accepted.
    pub fn completion_text(&self) -> String {
        format!("@{} ", self.display_path)
    }
}

/// An `@` being typed on a line, as found by [`detect_trigger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestTrigger {
    /// Char column of the `@`
    pub start: usize,
    /// Char column of the cursor
    pub end: usize,
    /// Text typed between the `@` and the cursor
    pub query: String,
}

/// Detect an `@` completion trigger ending at char column `cursor` of `line`.
///
/// Walks back from the cursor over non-whitespace characters until it reaches
/// an `@`. The `@` must start the line or follow whitespace.
pub fn detect_trigger(line: &str, cursor: usize) -> Option<SuggestTrigger> {
    let chars: Vec<char> = line.chars().collect();
    let cursor = cursor.min(chars.len());

    let mut start = cursor.checked_sub(1)?;
    while !chars[start].is_whitespace() && chars[start] != '@' {
        start = start.checked_sub(1)?;
    }
    if chars[start] != '@' {
        return None;
    }
    if start > 0 && !chars[start - 1].is_whitespace() {
        return None;
    }

    Some(SuggestTrigger {
        start,
        end: cursor,
        query: chars[start + 1..cursor].iter().collect(),
    })
}

/// Suggest completion targets for an `@` typed in `current_file`.
///
/// Candidates are the files of the current file's repository (or the whole
/// corpus when it has none), shown repository-relative and kept when the
/// display path contains `query`, case-insensitively. Corpus enumeration order
/// is preserved and the scan stops once `limit` candidates are collected.
pub fn suggest(
    corpus: &dyn Corpus,
    layout: &RepoLayout,
    current_file: &str,
    query: &str,
    limit: usize,
) -> Vec<Suggestion> {
    let root = layout.locate_root(current_file);
    let files = match corpus.files() {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!("Cannot list files for suggestions: {}", e);
            return Vec::new();
        }
    };
    let query = query.to_lowercase();

    let mut results = Vec::new();
    if limit == 0 {
        return results;
    }
    for path in files {
        if let Some(root) = root {
            if !RepoLayout::is_inside(&path, root) {
                continue;
            }
        }
        let display = to_relative(&path, root);
        if !query.is_empty() && !display.to_lowercase().contains(&query) {
            continue;
        }
        results.push(Suggestion {
            display_path: display.to_string(),
            target_path: path.clone(),
        });
        if results.len() >= limit {
            break;
        }
    }

    tracing::debug!(
        "Suggestions for {} (query {:?}): {} results",
        current_file,
        query,
        results.len()
    );
    results
}
