//! Domain model and use cases of the Stencil project generator.
//!
//! Nothing in here touches the disk or the terminal directly.
//! [`application::ports`] lists what the outside world has to
//! provide; `stencil-adapters` provides it, `stencil-cli` wires it up.
//!
//! ```text
//! stencil-cli ──▶ GenerateService / TemplateService / run_post_emit
//!                        │
//!                        ▼ ports
//!     TemplateStore · TemplateRenderer · Filesystem · Prompter · HookFactory
//!                        ▲
//!                        │ implemented by
//!                 stencil-adapters
//! ```
//!
//! ```rust,ignore
//! use stencil_core::application::{GenerateService, GenerationRequest};
//!
//! let service = GenerateService::new(store, renderer, filesystem, prompter, hooks);
//! let report = service
//!     .generate(GenerationRequest::new("browniexmix", "/tmp/proj").accept_defaults(true))
//!     .await?;
//! ```

pub mod application;
pub mod domain;
pub mod error;
