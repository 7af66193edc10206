//! Post-emit action adapters.
//!
//! [`MarkExecutable`] is the only shipped action. [`LocalHooks`] turns a
//! template's `[post_emit]` declaration into it.

mod factory;
mod mark_executable;

pub use factory::LocalHooks;
pub use mark_executable::{DEFAULT_TIMEOUT, MarkExecutable};
