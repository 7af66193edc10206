//! Application ports (traits) for external dependencies.
//!
//! Ports define the interfaces the application needs from the outside world.
//! Adapters in `stencil-adapters` implement these.
//!
//! - `Filesystem`: file operations
//! - `TemplateStore`: template storage/retrieval
//! - `TemplateRenderer`: template rendering
//! - `Prompter`: operator answers
//! - `PostEmitAction` / `HookFactory`: finalization after materialization

pub mod output;

pub use output::{Filesystem, HookFactory, PostEmitAction, Prompter, TemplateRenderer, TemplateStore};

#[cfg(test)]
pub use output::MockPrompter;
