use crate::workspace::Workspace;
use anyhow::Result;
use atpath_core::{navigate, resolve_target};

/// Execute the `resolve` command: print the corpus path a capture points to.
///
/// Fails when the target does not exist.
pub fn execute(ws: &Workspace, file: &str, capture: &str) -> Result<String> {
    let file = ws.corpus_path(file)?;
    let capture = capture.strip_prefix('@').unwrap_or(capture);
    let layout = ws.layout();
    match navigate(&ws.corpus, &layout, &file, capture) {
        Some(target) => Ok(format!("{}\n", target)),
        None => anyhow::bail!(
            "Reference target does not exist: {}",
            resolve_target(&layout, &file, capture)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::test_support::workspace;

    #[test]
    fn resolves_inside_repository() {
        let (_dir, ws) = workspace(&[("_repos/p/doc.md", ""), ("_repos/p/src/a.ts", "")]);
        assert_eq!(
            execute(&ws, "_repos/p/doc.md", "@src/a.ts").unwrap(),
            "_repos/p/src/a.ts\n"
        );
    }

    #[test]
    fn missing_target_names_resolved_path() {
        let (_dir, ws) = workspace(&[("_repos/p/doc.md", "")]);
        let err = execute(&ws, "_repos/p/doc.md", "x.md").unwrap_err();
        assert!(err.to_string().contains("_repos/p/x.md"));
    }
}
