use crate::error::CorpusError;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether a corpus path names a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
}

/// Capability to list, read and overwrite the documents of a corpus.
///
/// Paths are `/`-separated and compared exactly. Listing order is the
/// corpus enumeration order and is preserved by every consumer.
pub trait Corpus {
    /// All file paths, in enumeration order.
    fn files(&self) -> Result<Vec<String>, CorpusError>;

    /// Paths of the text documents whose references get rewritten.
    fn documents(&self) -> Result<Vec<String>, CorpusError>;

    fn read(&self, path: &str) -> Result<String, CorpusError>;

    /// Overwrite (or create) the document at `path`.
    fn write(&mut self, path: &str, contents: &str) -> Result<(), CorpusError>;

    /// `None` if nothing exists at `path`.
    fn entry_kind(&self, path: &str) -> Option<EntryKind>;

    fn exists(&self, path: &str) -> bool {
        self.entry_kind(path).is_some()
    }
}

pub(crate) fn has_extension(path: &str, extensions: &[String]) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => extensions.iter().any(|e| e == ext),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// MemoryCorpus
// ---------------------------------------------------------------------------

/// In-memory corpus keeping files in insertion order.
///
/// Records every successful write, and can be told to fail reads or writes of
/// specific paths with a permission error.
#[derive(Debug, Clone)]
pub struct MemoryCorpus {
    files: Vec<(String, String)>,
    folders: Vec<String>,
    extensions: Vec<String>,
    writes: Vec<String>,
    deny_read: HashSet<String>,
    deny_write: HashSet<String>,
}

impl Default for MemoryCorpus {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::with_extensions(&["md"])
    }

    pub fn with_extensions(extensions: &[&str]) -> Self {
        Self {
            files: Vec::new(),
            folders: Vec::new(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            writes: Vec::new(),
            deny_read: HashSet::new(),
            deny_write: HashSet::new(),
        }
    }

    /// Build a corpus from `(path, contents)` pairs, keeping their order.
    pub fn from_files<P: AsRef<str>, C: AsRef<str>>(files: &[(P, C)]) -> Self {
        let mut corpus = Self::new();
        for (path, contents) in files {
            corpus.insert(path.as_ref(), contents.as_ref());
        }
        corpus
    }

    /// Add or replace a file without recording a write.
    pub fn insert(&mut self, path: &str, contents: &str) {
        match self.files.iter_mut().find(|(p, _)| p == path) {
            Some(entry) => entry.1 = contents.to_string(),
            None => self.files.push((path.to_string(), contents.to_string())),
        }
    }

    /// Register an empty folder.
    pub fn add_folder(&mut self, path: &str) {
        if !self.folders.iter().any(|f| f == path) {
            self.folders.push(path.to_string());
        }
    }

    pub fn contents(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.as_str())
    }

    /// Paths written through [`Corpus::write`], in write order.
    pub fn written_paths(&self) -> &[String] {
        &self.writes
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub fn deny_read(&mut self, path: &str) {
        self.deny_read.insert(path.to_string());
    }

    pub fn deny_write(&mut self, path: &str) {
        self.deny_write.insert(path.to_string());
    }

    /// Move a file, or a folder with all its descendants, keeping enumeration order.
    pub fn rename(&mut self, old_path: &str, new_path: &str) -> Result<(), CorpusError> {
        let old_prefix = format!("{}/", old_path);
        let mut moved = false;
        for (path, _) in self.files.iter_mut() {
            if *path == old_path {
                *path = new_path.to_string();
                moved = true;
            } else if let Some(rest) = path.strip_prefix(&old_prefix) {
                *path = format!("{}/{}", new_path, rest);
                moved = true;
            }
        }
        for folder in self.folders.iter_mut() {
            if *folder == old_path {
                *folder = new_path.to_string();
                moved = true;
            } else if let Some(rest) = folder.strip_prefix(&old_prefix) {
                *folder = format!("{}/{}", new_path, rest);
            }
        }
        if moved {
            Ok(())
        } else {
            Err(CorpusError::NotFound(old_path.to_string()))
        }
    }
}

impl Corpus for MemoryCorpus {
    fn files(&self) -> Result<Vec<String>, CorpusError> {
        Ok(self.files.iter().map(|(p, _)| p.clone()).collect())
    }

    fn documents(&self) -> Result<Vec<String>, CorpusError> {
        Ok(self
            .files
            .iter()
            .filter(|(p, _)| has_extension(p, &self.extensions))
            .map(|(p, _)| p.clone())
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, CorpusError> {
        if self.deny_read.contains(path) {
            return Err(CorpusError::Read {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read denied"),
            });
        }
        self.contents(path)
            .map(str::to_string)
            .ok_or_else(|| CorpusError::NotFound(path.to_string()))
    }

    fn write(&mut self, path: &str, contents: &str) -> Result<(), CorpusError> {
        if self.deny_write.contains(path) {
            return Err(CorpusError::Write {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "write denied"),
            });
        }
        self.insert(path, contents);
        self.writes.push(path.to_string());
        Ok(())
    }

    fn entry_kind(&self, path: &str) -> Option<EntryKind> {
        if self.files.iter().any(|(p, _)| p == path) {
            return Some(EntryKind::File);
        }
        let prefix = format!("{}/", path);
        let is_folder = self.folders.iter().any(|f| f == path || f.starts_with(&prefix))
            || self.files.iter().any(|(p, _)| p.starts_with(&prefix));
        is_folder.then_some(EntryKind::Folder)
    }
}

// ---------------------------------------------------------------------------
// FsCorpus
// ---------------------------------------------------------------------------

/// Corpus backed by a directory on disk.
///
/// Corpus paths are relative to `root` and always use `/`. Hidden entries
/// (names starting with `.`) are skipped and symlinks are not followed.
/// Entries below the root that cannot be read are logged and left out of
/// the listing; only an unreadable root fails it.
#[derive(Debug, Clone)]
pub struct FsCorpus {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsCorpus {
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            root: root.into(),
            extensions: extensions.to_vec(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn full_path(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    fn corpus_path(&self, full: &Path) -> Option<String> {
        let rel = full.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        }
    }

    /// Move a file or folder on disk, creating missing parent folders.
    pub fn rename(&self, old_path: &str, new_path: &str) -> Result<(), CorpusError> {
        let from = self.full_path(old_path);
        let to = self.full_path(new_path);
        if !from.exists() {
            return Err(CorpusError::NotFound(old_path.to_string()));
        }
        let write_err = |source| CorpusError::Write {
            path: new_path.to_string(),
            source,
        };
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::rename(&from, &to).map_err(write_err)
    }
}

impl Corpus for FsCorpus {
    fn files(&self) -> Result<Vec<String>, CorpusError> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) if source.depth() == 0 => {
                    return Err(CorpusError::Walk {
                        root: self.root.display().to_string(),
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(path) = self.corpus_path(entry.path()) {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn documents(&self) -> Result<Vec<String>, CorpusError> {
        Ok(self
            .files()?
            .into_iter()
            .filter(|p| has_extension(p, &self.extensions))
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, CorpusError> {
        std::fs::read_to_string(self.full_path(path)).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                CorpusError::NotFound(path.to_string())
            } else {
                CorpusError::Read {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }

    fn write(&mut self, path: &str, contents: &str) -> Result<(), CorpusError> {
        std::fs::write(self.full_path(path), contents).map_err(|source| CorpusError::Write {
            path: path.to_string(),
            source,
        })
    }

    fn entry_kind(&self, path: &str) -> Option<EntryKind> {
        let meta = std::fs::metadata(self.full_path(path)).ok()?;
        if meta.is_dir() {
            Some(EntryKind::Folder)
        } else {
            Some(EntryKind::File)
        }
    }
}
