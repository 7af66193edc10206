//! Hook factory for the local machine.

use std::time::Duration;

use stencil_core::{
    application::ports::{HookFactory, PostEmitAction},
    domain::PostEmit,
};

use super::mark_executable::{DEFAULT_TIMEOUT, MarkExecutable};

/// Builds post-emit actions that act on the local filesystem.
#[derive(Debug, Clone, Copy)]
pub struct LocalHooks {
    timeout: Duration,
}

impl LocalHooks {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for LocalHooks {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HookFactory for LocalHooks {
    fn action_for(&self, spec: &PostEmit) -> Box<dyn PostEmitAction> {
        match spec {
            PostEmit::MarkExecutable { path } => {
                Box::new(MarkExecutable::new(path.clone()).with_timeout(self.timeout))
            }
        }
    }
}
