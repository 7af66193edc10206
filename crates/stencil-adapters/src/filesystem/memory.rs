//! [`Filesystem`] backed by a map, for tests that must not touch the disk.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use stencil_core::{
    application::{ApplicationError, ports::Filesystem},
    error::StencilResult,
};

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File { content: String, executable: bool },
}

/// Cheap to clone; clones share the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    nodes: Arc<RwLock<BTreeMap<PathBuf, Node>>>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_file(&self, path: &Path) -> Option<String> {
        match self.nodes.read().ok()?.get(path)? {
            Node::File { content, .. } => Some(content.clone()),
            Node::Dir => None,
        }
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.nodes
            .read()
            .is_ok_and(|nodes| matches!(nodes.get(path), Some(Node::File { executable: true, .. })))
    }

    /// File paths in sorted order.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let Ok(nodes) = self.nodes.read() else {
            return Vec::new();
        };
        nodes
            .iter()
            .filter(|(_, node)| matches!(node, Node::File { .. }))
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn update<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<PathBuf, Node>) -> StencilResult<T>,
    ) -> StencilResult<T> {
        let mut nodes = self
            .nodes
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        f(&mut nodes)
    }
}

fn missing(path: &Path, reason: &str) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        self.update(|nodes| {
            for ancestor in path.ancestors().filter(|a| !a.as_os_str().is_empty()) {
                nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
            }
            Ok(())
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()> {
        self.update(|nodes| {
            let parent_ok = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => matches!(nodes.get(p), Some(Node::Dir)),
                _ => true,
            };
            if !parent_ok {
                return Err(missing(path, "Parent directory does not exist").into());
            }
            nodes.insert(
                path.to_path_buf(),
                Node::File {
                    content: content.to_owned(),
                    executable: false,
                },
            );
            Ok(())
        })
    }

    fn set_executable(&self, path: &Path) -> StencilResult<()> {
        self.update(|nodes| match nodes.get_mut(path) {
            Some(Node::File { executable, .. }) => {
                *executable = true;
                Ok(())
            }
            _ => Err(missing(path, "No such file").into()),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.read().is_ok_and(|nodes| nodes.contains_key(path))
    }

    fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
        self.update(|nodes| {
            nodes.retain(|p, _| !p.starts_with(path));
            Ok(())
        })
    }
}
