//! Failures of a run as a whole, as opposed to broken templates or contexts
//! (those are [`DomainError`](crate::domain::DomainError)).

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::HookError;
use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A shared store or in-memory filesystem lock was poisoned.
    #[error("Template store error")]
    StoreLockError,

    /// `dest` exists and `--force` was not given.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    #[error("Could not read answer for '{prompt}': {reason}")]
    PromptFailed { prompt: String, reason: String },

    /// The operator interrupted prompting. Nothing has been written yet.
    #[error("Generation cancelled")]
    Cancelled,

    /// Files are on disk; the post-emit action did not finish.
    #[error("Post-emit action failed: {0}")]
    Hook(#[from] HookError),
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { name } => vec![
                format!("No template named '{name}'"),
                "Run `stencil list` for the available names".into(),
                "Or point --templates-dir at your template collection".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Could not write {}", path.display()),
                "Check the permissions of the destination's parent".into(),
            ],
            Self::StoreLockError => vec!["Retry the command".into()],
            Self::ProjectExists { path } => vec![
                format!("{} is already there", path.display()),
                "Pass --force to write into it anyway".into(),
                "Or pick another destination".into(),
            ],
            Self::PromptFailed { prompt, .. } => {
                vec![format!("Preset it instead: -a {prompt}=VALUE")]
            }
            Self::Cancelled => vec!["Nothing was written".into()],
            Self::Hook(e) => e.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::ProjectExists { .. }
            | Self::Cancelled
            | Self::Hook(HookError::HookInvocation { .. }) => ErrorCategory::Validation,
            Self::FilesystemError { .. }
            | Self::StoreLockError
            | Self::PromptFailed { .. }
            | Self::Hook(_) => ErrorCategory::Internal,
        }
    }
}
