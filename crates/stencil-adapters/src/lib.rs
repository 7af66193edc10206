//! Infrastructure adapters for Stencil.
//!
//! This crate implements the ports defined in `stencil_core::application::ports`.
//! It contains all I/O: filesystems, template discovery, rendering,
//! non-interactive prompting and post-emit actions.

pub mod builtin_templates;
pub mod filesystem;
pub mod hooks;
pub mod prompter;
pub mod renderer;
pub mod template_loader;
pub mod template_store;

pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use hooks::{LocalHooks, MarkExecutable};
pub use prompter::ScriptedPrompter;
pub use renderer::SimpleRenderer;
pub use template_store::InMemoryStore;
