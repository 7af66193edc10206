//! Prompter that answers from a fixed table.

use std::collections::HashMap;
use std::sync::Mutex;

use stencil_core::{
    application::{ApplicationError, ports::Prompter},
    domain::PromptSpec,
    error::StencilResult,
};

/// Answers prompts from a table; unknown prompts get no answer, so their
/// default applies.
///
/// Every question asked is recorded, which makes it useful for asserting
/// prompt order in tests and for `--yes` runs.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: HashMap<String, String>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.answers.insert(name.into(), value.into());
        self
    }

    /// Prompt names in the order they were asked.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, prompt: &PromptSpec) -> StencilResult<Option<String>> {
        self.asked
            .lock()
            .map_err(|_| ApplicationError::PromptFailed {
                prompt: prompt.name.clone(),
                reason: "prompt log poisoned".into(),
            })?
            .push(prompt.name.clone());

        Ok(self.answers.get(&prompt.name).cloned())
    }
}
