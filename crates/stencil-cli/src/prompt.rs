//! Terminal prompting for `stencil new`.

use std::io::IsTerminal as _;

use stencil_adapters::ScriptedPrompter;
use stencil_core::{application::Prompter, domain::Answers};
use tracing::debug;

/// Pick a prompter for this run.
///
/// Preset answers never reach the prompter, so only the remaining prompts are
/// asked. Without a terminal on stdin every remaining prompt takes its
/// default.
pub fn for_run(preset: &Answers) -> Box<dyn Prompter> {
    #[cfg(feature = "interactive")]
    {
        if std::io::stdin().is_terminal() {
            return Box::new(interactive::DialoguerPrompter::new());
        }
    }

    debug!(
        preset = preset.len(),
        tty = std::io::stdin().is_terminal(),
        "non-interactive prompting; remaining prompts take their defaults"
    );
    Box::new(ScriptedPrompter::new())
}

#[cfg(feature = "interactive")]
mod interactive {
    use std::io;

    use dialoguer::{Input, theme::ColorfulTheme};
    use stencil_core::{
        application::{ApplicationError, Prompter},
        domain::PromptSpec,
        error::StencilResult,
    };

    pub struct DialoguerPrompter {
        theme: ColorfulTheme,
    }

    impl DialoguerPrompter {
        pub fn new() -> Self {
            Self {
                theme: ColorfulTheme::default(),
            }
        }
    }

    impl Prompter for DialoguerPrompter {
        fn ask(&self, prompt: &PromptSpec) -> StencilResult<Option<String>> {
            let mut input = Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt.display_message())
                .allow_empty(true);
            if let Some(default) = &prompt.default {
                input = input.default(default.clone()).show_default(true);
            }

            match input.interact_text() {
                Ok(answer) => Ok(Some(answer)),
                Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => {
                    Err(ApplicationError::Cancelled.into())
                }
                Err(e) => Err(ApplicationError::PromptFailed {
                    prompt: prompt.name.clone(),
                    reason: e.to_string(),
                }
                .into()),
            }
        }
    }
}
