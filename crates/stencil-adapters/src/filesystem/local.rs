//! [`Filesystem`] on the real disk.

use std::fs;
use std::io;
use std::path::Path;

use stencil_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{StencilError, StencilResult},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        fs::create_dir_all(path).map_err(failed(path, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()> {
        fs::write(path, content).map_err(failed(path, "write file"))
    }

    /// `chmod u+x`. A no-op where there is no execute bit.
    fn set_executable(&self, path: &Path) -> StencilResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mode = fs::metadata(path)
                .map_err(failed(path, "read permissions of"))?
                .permissions()
                .mode();
            fs::set_permissions(path, fs::Permissions::from_mode(mode | 0o100))
                .map_err(failed(path, "set permissions on"))?;
        }
        #[cfg(not(unix))]
        let _ = path;

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
        fs::remove_dir_all(path).map_err(failed(path, "remove directory"))
    }
}

/// `map_err` adapter naming the operation and the path.
fn failed<'a>(path: &'a Path, operation: &'a str) -> impl FnOnce(io::Error) -> StencilError + 'a {
    move |e| {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: format!("Failed to {operation}: {e}"),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_and_removes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("proj");
        let fs = LocalFilesystem::new();

        fs.create_dir_all(&root.join("src")).unwrap();
        fs.write_file(&root.join("src/index.ts"), "x").unwrap();
        assert!(fs.exists(&root.join("src/index.ts")));

        fs.remove_dir_all(&root).unwrap();
        assert!(!fs.exists(&root));
    }

    #[test]
    fn write_into_missing_parent_fails() {
        let temp = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .write_file(&temp.path().join("nope/file.txt"), "x")
            .unwrap_err();
        assert!(err.to_string().contains("write file"));
    }

    #[cfg(unix)]
    #[test]
    fn set_executable_adds_owner_bit_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.sh");
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        LocalFilesystem::new().set_executable(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o740);
    }
}
