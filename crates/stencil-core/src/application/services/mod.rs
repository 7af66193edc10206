//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a project" or "list templates".

pub mod generate_service;
pub mod post_emit;
pub mod template_service;

pub use generate_service::{GenerateService, GenerationReport, GenerationRequest};
pub use post_emit::{HookState, run_post_emit};
pub use template_service::{PromptInfo, TemplateInfo, TemplateService};
