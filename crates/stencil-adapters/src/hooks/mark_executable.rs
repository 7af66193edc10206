//! Add owner-execute permission to one emitted file.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, instrument};

use stencil_core::{
    application::ports::PostEmitAction,
    domain::{Context, DEFAULT_EXECUTABLE, HookError, RelativePath},
};

/// Upper bound on the whole permission change.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `chmod u+x <dest>/<path>`, without spawning a process.
///
/// The file must already exist: this action never creates or writes it.
/// Bits other than owner-execute are left as they are, so running it twice
/// is the same as running it once.
#[derive(Debug, Clone)]
pub struct MarkExecutable {
    target: RelativePath,
    timeout: Duration,
}

impl MarkExecutable {
    pub fn new(target: RelativePath) -> Self {
        Self {
            target,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The shipped default: `console.sh` at the destination root.
    pub fn console() -> Self {
        Self::new(RelativePath::new(DEFAULT_EXECUTABLE))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn target(&self) -> &RelativePath {
        &self.target
    }
}

#[async_trait]
impl PostEmitAction for MarkExecutable {
    fn describe(&self) -> String {
        format!("chmod u+x {}", self.target)
    }

    #[instrument(skip_all, fields(dest = %ctx.dest().display(), target = %self.target))]
    async fn emit(&self, ctx: &Context) -> Result<(), HookError> {
        let dest = ctx.dest();
        if !dest.is_absolute() {
            return Err(HookError::invocation(format!(
                "destination must be absolute, got '{}'",
                dest.display()
            )));
        }

        let path = dest.join(self.target.as_path());
        within(self.timeout, &path, add_owner_execute(dest, &path)).await
    }
}

/// Run `work`, giving up with [`HookError::Timeout`] once `limit` elapses.
async fn within<F>(limit: Duration, path: &Path, work: F) -> Result<(), HookError>
where
    F: Future<Output = Result<(), HookError>>,
{
    tokio::time::timeout(limit, work)
        .await
        .unwrap_or_else(|_| {
            Err(HookError::Timeout {
                path: path.to_path_buf(),
                after: limit,
            })
        })
}

async fn add_owner_execute(dest: &Path, path: &Path) -> Result<(), HookError> {
    let fail = |e: io::Error| HookError::executable_bit(path, e);

    let root = fs::canonicalize(dest).await.map_err(fail)?;
    if fs::metadata(&root).await.map_err(fail)?.permissions().readonly() {
        return Err(fail(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("destination {} is not writable", root.display()),
        )));
    }
    let resolved: PathBuf = fs::canonicalize(path).await.map_err(fail)?;
    if !resolved.starts_with(&root) {
        return Err(fail(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("resolves to {} outside the destination", resolved.display()),
        )));
    }

    let metadata = fs::metadata(&resolved).await.map_err(fail)?;
    if !metadata.is_file() {
        return Err(fail(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = metadata.permissions();
        let mode = perms.mode();
        if mode & 0o100 != 0 {
            debug!(mode = format_args!("{:o}", mode & 0o7777), "already executable");
            return Ok(());
        }

        perms.set_mode(mode | 0o100);
        fs::set_permissions(&resolved, perms).await.map_err(fail)?;
        debug!(
            from = format_args!("{:o}", mode & 0o7777),
            to = format_args!("{:o}", (mode | 0o100) & 0o7777),
            "owner-execute added"
        );
    }

    #[cfg(not(unix))]
    debug!("no POSIX permission bits on this platform, file exists");

    Ok(())
}
