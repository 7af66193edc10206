//! Discovery of the templates that ship with Stencil.
//!
//! Templates are searched in this priority order, stopping at the first
//! directory that exists and returns at least one valid template:
//!
//! 1. **`$STENCIL_TEMPLATES_DIR`**: environment variable override.
//! 2. **`./templates`**: relative to the current working directory.
//! 3. **`<executable-dir>/templates`**: sibling to the `stencil` binary.
//! 4. **`../templates`**: one level above CWD, for development runs.
//!
//! If no directory is found, [`all_templates`] returns an empty `Vec` and
//! emits a `WARN` event. The CLI turns that into an actionable error.

use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use stencil_core::domain::{DomainError, Template};

use crate::template_loader::FilesystemTemplateLoader;

/// Environment variable naming an explicit templates directory.
pub const TEMPLATES_DIR_ENV: &str = "STENCIL_TEMPLATES_DIR";

/// Load all templates from the first candidate directory that has any.
///
/// Individual templates that fail to parse are skipped with a warning; an
/// unreadable candidate directory is an error.
#[instrument]
pub fn all_templates() -> Result<Vec<Template>, DomainError> {
    for candidate in candidate_paths() {
        debug!(path = %candidate.display(), "checking candidate templates path");

        if !candidate.is_dir() {
            continue;
        }

        let templates = FilesystemTemplateLoader::new(&candidate).load_all()?;

        if templates.is_empty() {
            debug!(path = %candidate.display(), "no templates here, trying next");
            continue;
        }

        info!(
            path  = %candidate.display(),
            count = templates.len(),
            "templates loaded"
        );
        return Ok(templates);
    }

    warn!(
        "no templates directory found; checked ${TEMPLATES_DIR_ENV}, \
         ./templates, <exe>/templates and ../templates"
    );
    Ok(vec![])
}

/// Candidate directories in priority order.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);

    if let Ok(env_dir) = std::env::var(TEMPLATES_DIR_ENV) {
        if !env_dir.is_empty() {
            paths.push(PathBuf::from(env_dir));
        }
    }

    paths.push(PathBuf::from("templates"));

    if let Some(exe_sibling) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
    {
        paths.push(exe_sibling);
    }

    paths.push(PathBuf::from("../templates"));

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cwd_candidates_are_always_present() {
        let paths = candidate_paths();
        assert!(paths.contains(&PathBuf::from("templates")));
        assert_eq!(paths.last(), Some(&PathBuf::from("../templates")));
    }
}
