//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stencil-adapters` crate provides implementations.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::{Context, HookError, PostEmit, ProjectStructure, PromptSpec, Template};
use crate::error::StencilResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stencil_adapters::filesystem::LocalFilesystem` (production)
/// - `stencil_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StencilResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()>;

    /// Add owner-execute permission, keeping the other bits.
    fn set_executable(&self, path: &Path) -> StencilResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StencilResult<()>;
}

/// Port for template storage and retrieval.
///
/// Implemented by `stencil_adapters::template_store::InMemoryStore`, which
/// is filled from `template.toml` manifests on disk.
pub trait TemplateStore: Send + Sync {
    /// Get a template by name (`name` or `name@version`).
    fn get(&self, name: &str) -> StencilResult<Template>;

    /// List all available templates, sorted by name.
    fn list(&self) -> StencilResult<Vec<Template>>;

    /// Insert or replace a template.
    fn insert(&self, template: Template) -> StencilResult<()>;
}

/// Port for template rendering.
pub trait TemplateRenderer: Send + Sync {
    /// Render a template into a project structure rooted at `output_root`.
    fn render(
        &self,
        template: &Template,
        context: &Context,
        output_root: &Path,
    ) -> StencilResult<ProjectStructure>;
}

/// Port for collecting one prompt answer from the operator.
///
/// Implemented by:
/// - `stencil_adapters::prompter::ScriptedPrompter` (preset answers)
/// - `stencil-cli`'s dialoguer prompter (interactive terminal)
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    /// Ask one question.
    ///
    /// `Ok(None)` or a blank string means "no answer": the prompt's default
    /// applies. Implementations return `ApplicationError::Cancelled` when the
    /// operator aborts.
    fn ask(&self, prompt: &PromptSpec) -> StencilResult<Option<String>>;
}

/// A finalization step run once, after materialization.
///
/// Implementations hold no state between invocations.
#[async_trait]
pub trait PostEmitAction: Send + Sync {
    /// Short human-readable description for logs and dry runs.
    fn describe(&self) -> String;

    /// Apply the side effect against `ctx.dest()`.
    async fn emit(&self, ctx: &Context) -> Result<(), HookError>;
}

/// Turns a template's post-emit declaration into a runnable action.
pub trait HookFactory: Send + Sync {
    fn action_for(&self, spec: &PostEmit) -> Box<dyn PostEmitAction>;
}
