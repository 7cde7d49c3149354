
use crate::corpus::EntryKind;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

// Compile regex once, reuse across calls.
// The leading boundary (start of text, whitespace or '(') has no lookbehind in
// the regex crate and is checked by hand around each candidate.
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"@([A-Za-z0-9_./-]+\.[A-Za-z0-9_]+|[A-Za-z0-9_./-][A-Za-z0-9_./ ()-]+?\.[A-Za-z0-9_]+)",
    )
    .unwrap()
});

/// Characters that may follow a renamed file reference, besides whitespace.
const CLOSING_PUNCTUATION: &[char] = &[')', ']', '}', ',', ';', ':', '!', '?'];

/// A located `@path` occurrence in a text buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceSpan {
    /// Byte offset of the leading `@`
    pub start: usize,
    /// Byte offset one past the last captured character
    pub end: usize,
    /// Matched text including the `@`, e.g. "@src/util.ts"
    pub matched: String,
    /// Captured path without the `@`, e.g. "src/util.ts"
    pub path: String,
}

/// True if a reference may start at `offset`: start of text, or right after
/// whitespace or an opening parenthesis.
fn has_leading_boundary(text: &str, offset: usize) -> bool {
    text[..offset]
        .chars()
        .next_back()
        .map_or(true, |c| c.is_whitespace() || c == '(')
}

/// True if a renamed file reference may end at `offset`.
fn has_trailing_boundary(text: &str, offset: usize) -> bool {
    text[offset..]
        .chars()
        .next()
        .map_or(true, |c| c.is_whitespace() || CLOSING_PUNCTUATION.contains(&c))
}

/// Lazy left-to-right scan over the references in a text.
pub struct References<'t> {
    text: &'t str,
    pos: usize,
}

impl Iterator for References<'_> {
    type Item = ReferenceSpan;

    fn next(&mut self) -> Option<ReferenceSpan> {
        loop {
            let caps = REFERENCE_RE.captures_at(self.text, self.pos)?;
            let whole = caps.get(0)?;
            if !has_leading_boundary(self.text, whole.start()) {
                // '@' is one byte, so the next candidate starts right after it.
                self.pos = whole.start() + 1;
                continue;
            }
            self.pos = whole.end();
            return Some(ReferenceSpan {
                start: whole.start(),
                end: whole.end(),
                matched: whole.as_str().to_string(),
                path: caps.get(1)?.as_str().to_string(),
            });
        }
    }
}

/// Find every `@path` reference in `text`, left to right, non-overlapping.
///
/// A reference must look like a file name with an extension; bare directories
/// are not matched. A `@` preceded by anything other than whitespace or `(`
/// (e.g. an email address) is plain text.
pub fn find_references(text: &str) -> References<'_> {
    References { text, pos: 0 }
}

/// Captured paths of all references in `text`.
pub fn extract_references(text: &str) -> Vec<String> {
    find_references(text).map(|r| r.path).collect()
}

/// A text edit: replace `remove_len` bytes at `offset` with `insert_text`.
#[derive(Debug, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte offset in source
    pub offset: usize,
    /// Number of bytes to remove
    pub remove_len: usize,
    /// Replacement text
    pub insert_text: String,
}

/// A compiled matcher for references to one renamed file or folder.
///
/// For a folder the reference must continue with `/` (`@old/...`), which covers
/// every descendant. For a file the reference must end at end of text, whitespace
/// or closing punctuation, so `@a.md` never matches inside `@a.md.bak`.
/// The path is matched literally (regex metacharacters are escaped) and
/// case-sensitively.
#[derive(Debug, Clone)]
pub struct RenamePattern {
    re: Regex,
    insert_text: String,
    kind: EntryKind,
}

impl RenamePattern {
    pub fn new(old_path: &str, new_path: &str, kind: EntryKind) -> Result<Self, regex::Error> {
        let (pattern, insert_text) = match kind {
            EntryKind::Folder => (
                format!("@{}/", regex::escape(old_path)),
                format!("@{}/", new_path),
            ),
            EntryKind::File => (
                format!("@{}", regex::escape(old_path)),
                format!("@{}", new_path),
            ),
        };
        Ok(Self {
            re: Regex::new(&pattern)?,
            insert_text,
            kind,
        })
    }

    /// Edits replacing every bounded, non-overlapping occurrence in `text`.
    /// Returns edits in reverse offset order for safe sequential application.
    pub fn edits(&self, text: &str) -> Vec<TextEdit> {
        let mut edits = Vec::new();
        let mut pos = 0;
        while let Some(m) = self.re.find_at(text, pos) {
            let bounded = has_leading_boundary(text, m.start())
                && (self.kind == EntryKind::Folder || has_trailing_boundary(text, m.end()));
            if !bounded {
                pos = m.start() + 1;
                continue;
            }
            edits.push(TextEdit {
                offset: m.start(),
                remove_len: m.len(),
                insert_text: self.insert_text.clone(),
            });
            pos = m.end();
        }

        // Sort in reverse offset order for safe sequential application
        edits.reverse();
        edits
    }
}

/// Find all references to `old_path` and return edits rewriting them to `new_path`.
/// See [`RenamePattern`] for the matching rules.
pub fn compute_reference_rename_edits(
    text: &str,
    old_path: &str,
    new_path: &str,
    kind: EntryKind,
) -> Result<Vec<TextEdit>, regex::Error> {
    Ok(RenamePattern::new(old_path, new_path, kind)?.edits(text))
}

/// Apply edits (in reverse offset order) to a copy of `text`.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> String {
    let mut out = text.to_string();
    for edit in edits {
        out.replace_range(edit.offset..edit.offset + edit.remove_len, &edit.insert_text);
    }
    out
}

/// Rewrite references to `old_path` in `text`.
/// Returns the new text and the number of references replaced.
pub fn rewrite_references(
    text: &str,
    old_path: &str,
    new_path: &str,
    kind: EntryKind,
) -> Result<(String, usize), regex::Error> {
    let edits = compute_reference_rename_edits(text, old_path, new_path, kind)?;
    Ok((apply_edits(text, &edits), edits.len()))
}
