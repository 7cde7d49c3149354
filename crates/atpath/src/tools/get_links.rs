use crate::workspace::Workspace;
use anyhow::{Context, Result};
use atpath_core::{backlinks, forward_links, Corpus};

/// Execute the `links` command: return backlinks and forward links for a document.
pub fn execute(ws: &Workspace, file: &str) -> Result<String> {
    let file = ws.corpus_path(file)?;
    if !ws.corpus.exists(&file) {
        anyhow::bail!("Document not found: {}", file);
    }
    let layout = ws.layout();

    let backlink_paths = backlinks(&ws.corpus, &layout, &file)
        .with_context(|| format!("Cannot collect backlinks of {}", file))?;
    let forward_link_paths = forward_links(&ws.corpus, &layout, &file)
        .with_context(|| format!("Cannot read {}", file))?;

    // Format output
    let mut output = String::new();
    output.push_str("Backlinks (documents linking to this):\n");
    if backlink_paths.is_empty() {
        output.push_str("- (none)\n");
    } else {
        for path in &backlink_paths {
            output.push_str(&format!("- {}\n", path));
        }
    }

    output.push_str("\nForward links (documents this links to):\n");
    if forward_link_paths.is_empty() {
        output.push_str("- (none)\n");
    } else {
        for path in &forward_link_paths {
            output.push_str(&format!("- {}\n", path));
        }
    }

    Ok(output)
}
