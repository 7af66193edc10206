use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::domain::{entities::common::Permissions, error::DomainError};

/// What a generation run is about to put on disk.
///
/// Produced by the renderer from a template and a context. Entry paths are
/// relative to `root` and kept in template order, so parents come before
/// children.
#[derive(Debug, Clone)]
pub struct ProjectStructure {
    pub(crate) root: PathBuf,
    pub(crate) entries: Vec<FsEntry>,
}

impl ProjectStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: String, perms: Permissions) {
        let path = path.into();
        self.entries.push(FsEntry::File(FileToWrite {
            path,
            content,
            permissions: perms,
        }));
    }

    pub fn add_directory(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.entries.push(FsEntry::Directory(DirectoryToCreate { path }));
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: String, perms: Permissions) -> Self {
        self.add_file(path, content, perms);
        self
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_directory(path);
        self
    }

    /// Every entry must be a unique path that stays under `root`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::InvalidTemplate(format!(
                "nothing to write under {}",
                self.root.display()
            )));
        }

        let mut seen: HashSet<&Path> = HashSet::with_capacity(self.entries.len());
        for path in self.entries.iter().map(FsEntry::path) {
            let shown = || path.display().to_string();

            if path.is_absolute() || path.has_root() {
                return Err(DomainError::AbsolutePathNotAllowed { path: shown() });
            }
            if path.components().any(|c| c == Component::ParentDir) {
                return Err(DomainError::PathEscape { path: shown() });
            }
            if !seen.insert(path) {
                return Err(DomainError::DuplicatePath { path: shown() });
            }
        }

        Ok(())
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(FsEntry::as_file)
    }

    pub fn directories(&self) -> impl Iterator<Item = &DirectoryToCreate> {
        self.entries.iter().filter_map(FsEntry::as_directory)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone)]
pub enum FsEntry {
    File(FileToWrite),
    Directory(DirectoryToCreate),
}

impl FsEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }

    pub fn as_file(&self) -> Option<&FileToWrite> {
        match self {
            Self::File(f) => Some(f),
            Self::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryToCreate> {
        match self {
            Self::Directory(d) => Some(d),
            Self::File(_) => None,
        }
    }
}

/// One rendered file. `permissions.executable` is applied at write time;
/// the post-emit action is separate from it.
#[derive(Debug, Clone)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
    pub permissions: Permissions,
}

#[derive(Debug, Clone)]
pub struct DirectoryToCreate {
    pub path: PathBuf,
}
