//! Errors raised by domain rules, and by post-emit actions.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// A template, prompt or answer set that breaks a rule. Raised before any
/// file is written.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Template '{template_id}' has no content")]
    EmptyTemplate { template_id: String },

    #[error("Path appears twice in template: {path}")]
    DuplicatePath { path: String },

    #[error("Path must be relative: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project directory: {path}")]
    PathEscape { path: String },

    #[error("Invalid prompt name '{name}': {reason}")]
    InvalidPromptName { name: String, reason: String },

    #[error("Prompt '{name}' is declared more than once")]
    DuplicatePrompt { name: String },

    #[error("Answer given for unknown prompt '{name}'")]
    UnknownAnswer { name: String },

    /// A builder was finished without a mandatory part.
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidTemplate(_)
            | Self::DuplicatePath { .. }
            | Self::InvalidPromptName { .. }
            | Self::DuplicatePrompt { .. } => {
                vec!["Fix the template's template.toml".into()]
            }
            Self::EmptyTemplate { .. } => {
                vec!["A template needs at least one file or directory".into()]
            }
            Self::PathEscape { path } | Self::AbsolutePathNotAllowed { path } => vec![
                format!("Write '{path}' relative to the project root, without '..'"),
            ],
            Self::UnknownAnswer { name } => vec![
                format!("The template has no prompt called '{name}'"),
                "`stencil list` shows what each template asks".into(),
            ],
            Self::MissingRequiredField { .. } => Vec::new(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownAnswer { .. } => ErrorCategory::Validation,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::InvalidTemplate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    InvalidTemplate,
    Internal,
}

/// Failures of a post-emit action.
///
/// Every variant is fatal to the generation run that invoked the hook.
#[derive(Debug, Error, Clone)]
pub enum HookError {
    /// The permission change on the target file was rejected.
    #[error("Failed to mark {} as executable: {source}", .path.display())]
    ExecutableBit {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// The hook was handed a context it cannot work with.
    #[error("Invalid hook context: {reason}")]
    HookInvocation { reason: String },

    /// The action did not settle within its time budget.
    ///
    /// Blocking filesystem calls already started are not cancelled, so the
    /// change may still have been applied when this is reported.
    #[error("Post-emit action on {} timed out after {}s", .path.display(), .after.as_secs())]
    Timeout { path: PathBuf, after: Duration },
}

impl HookError {
    pub fn executable_bit(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ExecutableBit {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub fn invocation(reason: impl Into<String>) -> Self {
        Self::HookInvocation {
            reason: reason.into(),
        }
    }

    /// Underlying OS error kind, when there is one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::ExecutableBit { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ExecutableBit { path, source } => {
                let mut hints = vec![format!("Could not change mode of {}", path.display())];
                match source.kind() {
                    io::ErrorKind::NotFound => hints.push(
                        "The file is missing; the template must create it before the hook runs"
                            .into(),
                    ),
                    io::ErrorKind::PermissionDenied => {
                        hints.push("Check that you own the file and its directory".into())
                    }
                    _ => hints.push(format!("Run: chmod u+x '{}'", path.display())),
                }
                hints.push("Re-run with --force once the cause is fixed".into());
                hints
            }
            Self::HookInvocation { .. } => vec![
                "The context must contain an absolute \"dest\" path".into(),
                "Example: {\"dest\": \"/tmp/my-project\", \"answers\": {}}".into(),
            ],
            Self::Timeout { .. } => vec![
                "The filesystem did not respond in time".into(),
                "Raise hooks.timeout_secs in the configuration file".into(),
            ],
        }
    }
}
