//! # Core Session Framework
//!
//! This module defines the generic building blocks for the single-controller session.
//!
//! ## Key Types
//!
//! - [`SessionEntity`]: The trait a state record implements to be owned by an actor.
//! - [`SessionActor`]: The generic actor that owns the state and applies transitions.
//! - [`SessionClient`]: The cloneable client used to send actions to the actor.
//! - [`FrameworkError`]: Plumbing errors (actor gone, reply dropped).

use std::fmt::Debug;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that a session state record implements to be owned by a [`SessionActor`].
///
/// # Architecture Note
/// Every mutation of the session goes through [`SessionEntity::apply`], a pure
/// transition from `(state, action)` to `(state', outcome)`. Nothing in `apply`
/// performs I/O, so the whole state machine can be exercised in plain unit tests
/// without spawning the actor.
///
/// The actor adds exactly one guarantee on top: transitions are applied one at a
/// time, in arrival order. That is what serializes user-triggered actions.
pub trait SessionEntity: Clone + Send + 'static {
    /// Enum of every transition the state understands.
    type Action: Send + Debug;

    /// Result type returned by a successful transition.
    type Outcome: Send + Debug;

    /// Error type returned by a rejected transition.
    ///
    /// Must absorb [`FrameworkError`] so that clients can surface a single error type.
    type Error: std::error::Error + From<FrameworkError> + Send + Sync + 'static;

    /// Apply one transition. A rejected transition must leave `self` unchanged.
    fn apply(&mut self, action: Self::Action) -> Result<Self::Outcome, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the session plumbing itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("Session actor closed")]
    ActorClosed,
    #[error("Session actor dropped response channel")]
    ActorDropped,
    #[error("Session actor replied with an unexpected outcome (expected {0})")]
    UnexpectedOutcome(&'static str),
    #[error("Session task failed: {0}")]
    TaskFailed(String),
}

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T, E> = oneshot::Sender<Result<T, E>>;

/// Internal message type sent to the actor.
#[derive(Debug)]
pub enum SessionRequest<T: SessionEntity> {
    Apply {
        action: T::Action,
        respond_to: Response<T::Outcome, T::Error>,
    },
    Snapshot {
        respond_to: oneshot::Sender<T>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that owns one session state.
///
/// **Concurrency Model**:
/// The actor processes its messages *sequentially* in a loop, so the state needs
/// no `Mutex`. Long-running work (network calls) never happens inside the loop;
/// clients take a snapshot, do the work, then report back with another action.
pub struct SessionActor<T: SessionEntity> {
    receiver: mpsc::Receiver<SessionRequest<T>>,
    state: T,
}

impl<T: SessionEntity> SessionActor<T> {
    /// Creates a new `SessionActor` owning `initial` and its associated `SessionClient`.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full, client
    /// calls wait for space.
    pub fn new(buffer_size: usize, initial: T) -> (Self, SessionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            state: initial,
        };
        (actor, SessionClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Session actor started");

        let mut applied: u64 = 0;
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SessionRequest::Apply { action, respond_to } => {
                    debug!(entity_type, ?action, "Apply");
                    let result = self.state.apply(action);
                    match &result {
                        Ok(outcome) => {
                            applied += 1;
                            debug!(entity_type, ?outcome, "Applied");
                        }
                        Err(e) => warn!(entity_type, error = %e, "Rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                SessionRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(self.state.clone());
                }
            }
        }

        info!(entity_type, applied, "Shutdown");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for a `SessionActor`. Cheap to clone; holds only a sender.
pub struct SessionClient<T: SessionEntity> {
    sender: mpsc::Sender<SessionRequest<T>>,
}

impl<T: SessionEntity> Clone for SessionClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: SessionEntity> SessionClient<T> {
    pub fn new(sender: mpsc::Sender<SessionRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn apply(&self, action: T::Action) -> Result<T::Outcome, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SessionRequest::Apply { action, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn snapshot(&self) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SessionRequest::Snapshot { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
