//! [`StencilError`]: what every public service call returns.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{self, DomainError, HookError};

#[derive(Debug, Error, Clone)]
pub enum StencilError {
    /// A template, prompt or context broke a rule.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Application(#[from] ApplicationError),
}

impl From<HookError> for StencilError {
    fn from(err: HookError) -> Self {
        ApplicationError::Hook(err).into()
    }
}

impl StencilError {
    /// Next steps for the operator, most specific first.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                domain::ErrorCategory::Validation => ErrorCategory::Validation,
                domain::ErrorCategory::InvalidTemplate => ErrorCategory::Configuration,
                domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// The post-emit failure behind this error, if that is what it is.
    pub fn hook_error(&self) -> Option<&HookError> {
        match self {
            Self::Application(ApplicationError::Hook(e)) => Some(e),
            _ => None,
        }
    }
}

/// Coarse grouping the CLI turns into exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

pub type StencilResult<T> = Result<T, StencilError>;
