use crate::workspace::Workspace;
use anyhow::{Context, Result};
use atpath_core::{find_references, resolve_target, Corpus};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RefEntry {
    start: usize,
    end: usize,
    path: String,
    target: String,
    exists: bool,
}

/// Execute the `refs` command: list every reference in a document with its resolved target.
pub fn execute(ws: &Workspace, file: &str, json: bool) -> Result<String> {
    let file = ws.corpus_path(file)?;
    let content = ws
        .corpus
        .read(&file)
        .with_context(|| format!("Cannot read {}", file))?;
    let layout = ws.layout();

    let entries: Vec<RefEntry> = find_references(&content)
        .map(|span| {
            let target = resolve_target(&layout, &file, &span.path);
            RefEntry {
                start: span.start,
                end: span.end,
                exists: ws.corpus.exists(&target),
                path: span.path,
                target,
            }
        })
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&entries)?);
    }

    let mut output = String::new();
    if entries.is_empty() {
        output.push_str("(no references)\n");
    }
    for entry in &entries {
        output.push_str(&format!(
            "{}..{}\t@{}\t-> {}{}\n",
            entry.start,
            entry.end,
            entry.path,
            entry.target,
            if entry.exists { "" } else { " (missing)" }
        ));
    }
    Ok(output)
}
