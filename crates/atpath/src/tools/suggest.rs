use crate::workspace::Workspace;
use anyhow::Result;
use atpath_core::suggest;

/// Execute the `suggest` command: completion candidates for `@query` typed in `file`.
pub fn execute(
    ws: &Workspace,
    file: &str,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<String> {
    let file = ws.corpus_path(file)?;
    let limit = limit.unwrap_or(ws.config.suggestion_limit);
    let suggestions = suggest::suggest(&ws.corpus, &ws.layout(), &file, query, limit);

    if json {
        return Ok(serde_json::to_string_pretty(&suggestions)?);
    }
    let mut output = String::new();
    for s in &suggestions {
        output.push_str(&format!("{}\n", s.display_path));
    }
    Ok(output)
}
