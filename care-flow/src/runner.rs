//! FlowRunner – the controller that sits between a form and a remote [`Task`].
//!
//! A runner owns everything the presentation layer needs to render one workflow:
//! the last submitted input, the request status, the last result or the generic
//! error message, and when the last request settled. The task itself stays
//! stateless.
//!
//! ## Request lifecycle
//! 1. `submit` runs [`Task::validate`]. A rejected input never reaches the
//!    network and leaves the runner untouched.
//! 2. The runner bumps its request generation and moves to `in-flight`.
//! 3. When the task finishes, the outcome is applied only if no newer request
//!    (or `reset`) has happened in the meantime. A late response from a
//!    superseded request is dropped.
//!
//! ## Sharing a runner
//! `FlowRunner` is cheap to clone (two `Arc`s) and every clone drives the same
//! controller state:
//! ```rust,ignore
//! let runner = FlowRunner::new(Arc::new(task));
//! let handle = {
//!     let runner = runner.clone();
//!     tokio::spawn(async move { runner.submit(input).await })
//! };
//! // meanwhile the UI polls runner.snapshot()
//! ```
//!
//! The state mutex is never held across an `.await`, so snapshots are always
//! available while a request is pending.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::{
    error::{FlowError, Result},
    task::Task,
};

/// Where a runner is in its request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    /// Nothing submitted yet, or the runner was reset
    Idle,
    /// A request is pending
    InFlight,
    /// The last request produced a result
    Settled,
    /// The last request failed; `error` holds the generic message
    SettledWithError,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestStatus::Idle => "idle",
            RequestStatus::InFlight => "in-flight",
            RequestStatus::Settled => "settled",
            RequestStatus::SettledWithError => "settled-with-error",
        };
        f.write_str(label)
    }
}

/// What happens when `submit` is called while a request is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyPolicy {
    /// Start the new request; the pending one's response will be discarded
    #[default]
    Supersede,
    /// Refuse the new request with [`FlowError::Busy`]
    RejectWhileInFlight,
}

/// Point-in-time view of a runner, handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<I, O> {
    pub generation: u64,
    pub status: RequestStatus,
    pub input: Option<I>,
    pub result: Option<O>,
    pub error: Option<String>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl<I, O> Snapshot<I, O> {
    fn idle(generation: u64) -> Self {
        Self {
            generation,
            status: RequestStatus::Idle,
            input: None,
            result: None,
            error: None,
            settled_at: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::InFlight
    }
}

/// Single-flight controller around a [`Task`]
pub struct FlowRunner<T: Task> {
    task: Arc<T>,
    state: Arc<Mutex<Snapshot<T::Input, T::Output>>>,
    policy: ConcurrencyPolicy,
}

impl<T: Task> Clone for FlowRunner<T> {
    fn clone(&self) -> Self {
        Self {
            task: self.task.clone(),
            state: self.state.clone(),
            policy: self.policy,
        }
    }
}

impl<T: Task> FlowRunner<T> {
    /// Create an idle runner using the default [`ConcurrencyPolicy::Supersede`].
    pub fn new(task: Arc<T>) -> Self {
        Self {
            task,
            state: Arc::new(Mutex::new(Snapshot::idle(0))),
            policy: ConcurrencyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ConcurrencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn task(&self) -> &T {
        &self.task
    }

    pub fn policy(&self) -> ConcurrencyPolicy {
        self.policy
    }

    pub fn snapshot(&self) -> Snapshot<T::Input, T::Output> {
        self.lock().clone()
    }

    pub fn status(&self) -> RequestStatus {
        self.lock().status
    }

    /// Drop all state and invalidate any pending request.
    pub fn reset(&self) {
        let mut state = self.lock();
        let generation = state.generation + 1;
        *state = Snapshot::idle(generation);
        debug!(task_id = %self.task.id(), generation, "Runner reset");
    }

    /// Validate and run one request, then return the runner state once it settles.
    ///
    /// Remote failures do not surface as `Err`: they settle the runner with
    /// [`RequestStatus::SettledWithError`] and the task's generic failure
    /// message. `Err` is reserved for submissions that never started
    /// ([`FlowError::InvalidInput`], [`FlowError::Busy`]).
    ///
    /// If a newer request started while this one was pending, the returned
    /// snapshot belongs to that newer generation and this request's outcome
    /// has been discarded.
    pub async fn submit(&self, input: T::Input) -> Result<Snapshot<T::Input, T::Output>> {
        let task_id = self.task.id().to_string();

        if let Err(e) = self.task.validate(&input) {
            warn!(task_id = %task_id, error_kind = e.kind(), "Submission blocked: {}", e);
            return Err(e);
        }

        let generation = self.begin(&task_id, input.clone())?;
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "flow_request",
            task_id = %task_id,
            generation,
            request_id = %request_id
        );

        let outcome = async {
            info!("Request started");
            self.task.run(input).await
        }
        .instrument(span.clone())
        .await;

        Ok(span.in_scope(|| self.settle(generation, outcome)))
    }

    fn begin(&self, task_id: &str, input: T::Input) -> Result<u64> {
        let mut state = self.lock();

        if state.status == RequestStatus::InFlight {
            match self.policy {
                ConcurrencyPolicy::RejectWhileInFlight => {
                    warn!(
                        task_id = %task_id,
                        generation = state.generation,
                        "Rejecting submission while a request is in flight"
                    );
                    return Err(FlowError::Busy);
                }
                ConcurrencyPolicy::Supersede => {
                    debug!(
                        task_id = %task_id,
                        superseded_generation = state.generation,
                        "Superseding in-flight request"
                    );
                }
            }
        }

        state.generation += 1;
        state.status = RequestStatus::InFlight;
        state.input = Some(input);
        state.result = None;
        state.error = None;
        state.settled_at = None;
        Ok(state.generation)
    }

    fn settle(
        &self,
        generation: u64,
        outcome: Result<T::Output>,
    ) -> Snapshot<T::Input, T::Output> {
        let mut state = self.lock();

        if state.generation != generation {
            debug!(
                current_generation = state.generation,
                "Discarding response from superseded request"
            );
            return state.clone();
        }

        match outcome {
            Ok(output) => {
                state.status = RequestStatus::Settled;
                state.result = Some(output);
                state.error = None;
                info!("Request settled");
            }
            Err(e) => {
                // Format problems point at the model, everything else at the call.
                match &e {
                    FlowError::ResponseFormat(_) => {
                        warn!(error_kind = e.kind(), "Request failed: {}", e)
                    }
                    _ => error!(error_kind = e.kind(), "Request failed: {}", e),
                }
                state.status = RequestStatus::SettledWithError;
                state.result = None;
                state.error = Some(self.task.failure_message().to_string());
            }
        }

        state.settled_at = Some(Utc::now());
        state.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot<T::Input, T::Output>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
