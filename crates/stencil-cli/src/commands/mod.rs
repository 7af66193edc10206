//! Command handlers, one module per subcommand.

use std::path::{Path, PathBuf};

use tracing::debug;

use stencil_adapters::{InMemoryStore, builtin_templates};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
};

pub mod completions;
pub mod config;
pub mod emit;
pub mod init;
pub mod list;
pub mod new;

/// Load templates from `--templates-dir`, then `templates.dir` from the
/// config, then the built-in search path.
pub(crate) fn load_store(explicit: Option<&Path>, config: &AppConfig) -> CliResult<InMemoryStore> {
    let (store, searched) = match explicit.or(config.templates.dir.as_deref()) {
        Some(dir) => {
            debug!(dir = %dir.display(), "loading templates from configured directory");
            (InMemoryStore::from_dir(dir)?, vec![dir.to_path_buf()])
        }
        None => (
            InMemoryStore::with_builtin()?,
            builtin_templates::candidate_paths(),
        ),
    };

    if store.is_empty() {
        return Err(CliError::NoTemplates { searched });
    }
    Ok(store)
}

/// Resolve `path` against the working directory without touching the
/// filesystem; the destination usually does not exist yet.
pub(crate) fn absolute(path: &Path) -> CliResult<PathBuf> {
    std::path::absolute(path)
        .with_cli_context(|| format!("cannot resolve '{}'", path.display()))
}
