use super::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A path that cannot leave the directory it is joined onto: never rooted,
/// never empty, no `..` component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// For paths written into the source.
    ///
    /// # Panics
    ///
    /// If `path` is not a valid relative path. Anything read from a manifest,
    /// a flag or a file goes through [`RelativePath::try_new`] instead.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::try_new(path).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let shown = || path.display().to_string();

        if path.has_root() {
            return Err(DomainError::AbsolutePathNotAllowed { path: shown() });
        }
        if path.as_os_str().is_empty() {
            return Err(DomainError::InvalidTemplate("path cannot be empty".into()));
        }
        if path.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
            return Err(DomainError::PathEscape { path: shown() });
        }
        Ok(Self(path))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Empty for non-UTF-8 paths, which the loader never produces.
    pub fn as_str(&self) -> &str {
        self.0.to_str().unwrap_or_default()
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl TryFrom<String> for RelativePath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl From<RelativePath> for String {
    fn from(p: RelativePath) -> Self {
        p.to_string()
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Mode a file is written with. Only the owner-execute bit is ours to set;
/// everything else comes from the process umask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    executable: bool,
}

impl Permissions {
    pub const fn read_write() -> Self {
        Self { executable: false }
    }

    pub const fn executable() -> Self {
        Self { executable: true }
    }

    pub const fn is_executable(&self) -> bool {
        self.executable
    }
}
