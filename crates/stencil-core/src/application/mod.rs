//! Application layer for Stencil.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerateService, TemplateService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! template rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    GenerateService, GenerationReport, GenerationRequest, HookState, PromptInfo, TemplateInfo,
    TemplateService, run_post_emit,
};

pub use ports::{
    Filesystem, HookFactory, PostEmitAction, Prompter, TemplateRenderer, TemplateStore,
};

pub use error::ApplicationError;
