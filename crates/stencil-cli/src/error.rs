//! Errors surfaced by the `stencil` binary, their exit codes and how they
//! are printed.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use stencil_core::error::StencilError;

pub use stencil_core::error::ErrorCategory as CoreCategory;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input that clap could not catch.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Bad `-c` file, bad `STENCIL_*` value, or `init` could not write.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No template directory produced any template.
    #[error("No templates found")]
    NoTemplates { searched: Vec<PathBuf> },

    /// An error propagated from `stencil-core`.
    #[error(transparent)]
    Core(#[from] StencilError),

    /// Local I/O outside the generate pipeline: stdin, config files, output.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Lines printed under "Suggestions:".
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["See `stencil <command> --help`".into()],

            Self::ConfigError { .. } => vec![
                format!(
                    "Default config location: {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "`stencil init --force` rewrites it with defaults".into(),
            ],

            Self::NoTemplates { searched } => {
                let mut hints = vec!["Searched:".to_string()];
                for path in searched {
                    hints.push(format!("  • {}", path.display()));
                }
                hints.push("Point --templates-dir or STENCIL_TEMPLATES_DIR at a templates directory".into());
                hints
            }

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { source, .. } => match source.kind() {
                std::io::ErrorKind::PermissionDenied => vec!["Check file permissions".into()],
                std::io::ErrorKind::NotFound => vec!["Check that the path exists".into()],
                _ => Vec::new(),
            },
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::NoTemplates { .. } => ErrorCategory::NotFound,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// 2 user error, 3 not found, 4 configuration, 1 everything else.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Render for a colour terminal.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, &Paint {
            headline: |s| s.red().bold().to_string(),
            message: |s| s.red().to_string(),
            cause: |s| format!("{} {}", "→".dimmed(), s.dimmed()),
            section: |s| s.yellow().bold().to_string(),
            hint: |s| format!("{} {}", "\u{2139}".blue(), s.dimmed()),
        })
    }

    /// Render without ANSI codes, for pipes and `NO_COLOR`.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, &Paint {
            headline: str::to_owned,
            message: str::to_owned,
            cause: |s| format!("Caused by: {s}"),
            section: str::to_owned,
            hint: str::to_owned,
        })
    }

    fn render(&self, verbose: bool, paint: &Paint) -> String {
        let mut out = format!(
            "\n{} {}\n",
            (paint.headline)("Error:"),
            (paint.message)(&self.to_string())
        );

        if verbose {
            let causes = std::iter::successors(self.source(), |&e| e.source());
            for cause in causes {
                out.push_str(&format!("  {}\n", (paint.cause)(&cause.to_string())));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!("\n{}\n", (paint.section)("Suggestions:")));
            for line in suggestions {
                out.push_str(&format!("  {line}\n"));
            }
        }

        if !verbose {
            out.push_str(&format!("\n{}\n", (paint.hint)("Use -v / --verbose for more details.")));
        }

        out
    }

    /// Emit one event at a level matching the category.
    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, error = %self, "command failed");
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, error = %self, "command failed");
            }
        }

        if let Some(source) = self.source() {
            tracing::debug!(%source, "underlying error");
        }
    }
}

/// Per-part styling used by [`CliError::render`].
struct Paint {
    headline: fn(&str) -> String,
    message: fn(&str) -> String,
    cause: fn(&str) -> String,
    section: fn(&str) -> String,
    hint: fn(&str) -> String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

/// Attach a context message when converting I/O failures into [`CliError`].
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}
