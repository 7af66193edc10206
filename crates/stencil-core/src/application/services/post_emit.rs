//! Running a post-emit action exactly once.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::PostEmitAction,
    domain::{Context, HookError},
};

/// Lifecycle of the post-emit action within one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HookState {
    Pending,
    Running,
    Succeeded,
    Failed,
    /// The template declares no action, or the run was a dry run.
    Skipped,
}

impl fmt::Display for HookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Invoke `action` once against `ctx`.
///
/// There is no retry: a failure is returned as-is and the state ends at
/// `Failed`. Files already written are left in place.
#[instrument(skip_all, fields(action = %action.describe(), dest = %ctx.dest().display()))]
pub async fn run_post_emit(
    action: &dyn PostEmitAction,
    ctx: &Context,
) -> Result<HookState, HookError> {
    let mut state = HookState::Pending;
    debug!(%state, "Post-emit action queued");

    state = HookState::Running;
    debug!(%state, "Post-emit action started");

    match action.emit(ctx).await {
        Ok(()) => {
            state = HookState::Succeeded;
            info!(%state, "Post-emit action finished");
            Ok(state)
        }
        Err(e) => {
            state = HookState::Failed;
            warn!(%state, error = %e, "Post-emit action failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Answers;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PostEmitAction for Counting {
        fn describe(&self) -> String {
            "count".into()
        }

        async fn emit(&self, ctx: &Context) -> Result<(), HookError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(HookError::executable_bit(
                    ctx.dest().join("console.sh"),
                    std::io::Error::from(std::io::ErrorKind::NotFound),
                ))
            } else {
                Ok(())
            }
        }
    }

    fn ctx() -> Context {
        let dest = std::env::temp_dir().join("stencil-post-emit");
        Context::new(dest, Answers::new()).unwrap()
    }

    #[tokio::test]
    async fn success_is_reported_once() {
        let action = Counting {
            calls: AtomicUsize::new(0),
            fail: false,
        };

        let state = run_post_emit(&action, &ctx()).await.unwrap();

        assert_eq!(state, HookState::Succeeded);
        assert_eq!(action.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_not_retried() {
        let action = Counting {
            calls: AtomicUsize::new(0),
            fail: true,
        };

        let err = run_post_emit(&action, &ctx()).await.unwrap_err();

        assert!(matches!(err, HookError::ExecutableBit { .. }));
        assert_eq!(action.calls.load(Ordering::SeqCst), 1);
    }
}
