use crate::config::DEFAULT_MARKER;

/// Locates repository roots for a given marker segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    /// Marker segment followed by the separator, e.g. `"_repos/"`.
    needle: String,
}

impl Default for RepoLayout {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl RepoLayout {
    pub fn new(marker: &str) -> Self {
        Self {
            needle: format!("{}/", marker),
        }
    }

    /// Find the repository root enclosing `path`.
    ///
    /// Returns `None` when `path` has no marker segment, or when the marker is
    /// only followed by a final segment (the repository folder itself).
    pub fn locate_root<'a>(&self, path: &'a str) -> Option<&'a str> {
        let idx = path.find(&self.needle)?;
        let after = idx + self.needle.len();
        let slash = path[after..].find('/')?;
        Some(&path[..after + slash])
    }

    /// Repository-relative form of `path`, computed against its own root.
    pub fn relative<'a>(&self, path: &'a str) -> &'a str {
        to_relative(path, self.locate_root(path))
    }

    /// True if `path` starts with `root` followed by a separator.
    pub fn is_inside(path: &str, root: &str) -> bool {
        path.len() > root.len() && path.starts_with(root) && path.as_bytes()[root.len()] == b'/'
    }
}

/// [`RepoLayout::locate_root`] with the default `_repos` marker.
pub fn locate_root(path: &str) -> Option<&str> {
    RepoLayout::default().locate_root(path)
}

/// Strip `root` and the following separator from `path`.
///
/// With no root the path is returned unchanged: files outside any repository
/// reference each other by full corpus path. Callers derive `root` from `path`
/// or from a path sharing its root; a path outside `root` comes back as is.
pub fn to_relative<'a>(path: &'a str, root: Option<&str>) -> &'a str {
    match root {
        Some(root) if !root.is_empty() => path
            .strip_prefix(root)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path),
        _ => path,
    }
}

/// Join a repository-relative path back onto its root.
pub fn to_corpus(relative: &str, root: Option<&str>) -> String {
    match root {
        Some(root) if !root.is_empty() => format!("{}/{}", root, relative),
        _ => relative.to_string(),
    }
}
