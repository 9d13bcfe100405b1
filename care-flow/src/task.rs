use async_trait::async_trait;

use crate::error::Result;

/// Message shown to the user when a task fails and no task-specific one is given
pub const DEFAULT_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Core trait that all workflow tasks must implement
///
/// A task is one request/response round trip against a remote service. It
/// never holds per-request state; the [`FlowRunner`](crate::FlowRunner) that
/// drives it owns input, status and results.
#[async_trait]
pub trait Task: Send + Sync {
    /// Form state submitted by the caller
    type Input: Clone + Send + Sync + 'static;
    /// Typed result handed to the presentation layer
    type Output: Clone + Send + Sync + 'static;

    /// Unique identifier for this task
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Caller-side validation, run before any remote call.
    ///
    /// Return [`FlowError::InvalidInput`](crate::FlowError::InvalidInput) to
    /// block submission.
    fn validate(&self, _input: &Self::Input) -> Result<()> {
        Ok(())
    }

    /// Generic message exposed when `run` fails
    fn failure_message(&self) -> &str {
        DEFAULT_FAILURE_MESSAGE
    }

    /// Execute the task with the given input
    async fn run(&self, input: Self::Input) -> Result<Self::Output>;
}
