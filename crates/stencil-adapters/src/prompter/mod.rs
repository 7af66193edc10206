//! Non-interactive prompter adapters.

mod scripted;

pub use scripted::ScriptedPrompter;
