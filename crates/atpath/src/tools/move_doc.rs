use crate::workspace::Workspace;
use anyhow::{Context, Result};
use atpath_core::{propagate, Corpus, RenameEvent};

/// Execute the `mv` command: move a file or folder on disk, then rewrite every
/// reference to it across the corpus.
pub fn execute(ws: &mut Workspace, old_path: &str, new_path: &str) -> Result<String> {
    let old_path = ws.corpus_path(old_path)?;
    let new_path = ws.corpus_path(new_path)?;

    if old_path.is_empty() || new_path.is_empty() {
        anyhow::bail!("Paths must name an entry inside the corpus");
    }
    if !ws.corpus.exists(&old_path) {
        anyhow::bail!("Not found: {}", old_path);
    }
    if ws.corpus.exists(&new_path) {
        anyhow::bail!("Path '{}' already exists", new_path);
    }
    if new_path.starts_with(&format!("{}/", old_path)) {
        anyhow::bail!("Cannot move {} into itself", old_path);
    }

    ws.corpus
        .rename(&old_path, &new_path)
        .with_context(|| format!("Failed to move {} -> {}", old_path, new_path))?;

    let event = RenameEvent::from_host(&ws.corpus, &new_path, &old_path);
    let layout = ws.layout();
    let report = propagate(&mut ws.corpus, &layout, &event)
        .context("Moved on disk, but failed to list documents for reference updates")?;

    let mut output = format!(
        "Moved {} -> {} ({} references rewritten in {} documents)\n",
        old_path,
        new_path,
        report.references_rewritten,
        report.documents_rewritten(),
    );
    for failure in &report.failures {
        output.push_str(&format!(
            "- failed to update {}: {}\n",
            failure.path, failure.error
        ));
    }
    Ok(output)
}
