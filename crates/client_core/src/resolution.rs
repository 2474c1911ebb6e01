//! Request/resolution lifecycle: `Idle → Loading → (Success | Failure)`.
//!
//! Transitions are pure ([`ResolutionState::apply`]). [`ResolutionMachine`] adds
//! request fencing on top: every submit gets a fresh [`RequestGeneration`] and only
//! the newest generation may commit, so the last request issued wins no matter
//! in which order responses arrive.

use std::fmt;

use shared::{error::ServiceError, protocol::Payload};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::SolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Service,
    Transport,
    Decode,
}

/// What the error panel shows, plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    pub kind: FailureKind,
    pub error: ServiceError,
}

impl From<SolveError> for ResolutionFailure {
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::Service { error, .. } => Self {
                kind: FailureKind::Service,
                error,
            },
            SolveError::Decode { source, .. } => Self {
                kind: FailureKind::Decode,
                error: ServiceError::new("malformed response", source.to_string()),
            },
            SolveError::Transport(err) => Self {
                kind: FailureKind::Transport,
                error: ServiceError::new("transport error", err.to_string()),
            },
            err @ SolveError::Endpoint(_) => Self {
                kind: FailureKind::Transport,
                error: ServiceError::new("transport error", err.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolutionState {
    #[default]
    Idle,
    Loading,
    Success(Payload),
    Failure(ResolutionFailure),
}

impl ResolutionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success(_) => "success",
            Self::Failure(_) => "failure",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Next state for `event`. Submitting is valid from anywhere; a response is
    /// only valid while loading.
    pub fn apply(&self, event: ResolutionEvent) -> Result<ResolutionState, TransitionError> {
        match (self, event) {
            (_, ResolutionEvent::Submitted) => Ok(Self::Loading),
            (Self::Loading, ResolutionEvent::Resolved(Ok(payload))) => Ok(Self::Success(payload)),
            (Self::Loading, ResolutionEvent::Resolved(Err(failure))) => {
                Ok(Self::Failure(failure))
            }
            (state, ResolutionEvent::Resolved(_)) => Err(TransitionError::UnexpectedResponse {
                state: state.name(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ResolutionEvent {
    Submitted,
    Resolved(Result<Payload, ResolutionFailure>),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("response received while {state}")]
    UnexpectedResponse { state: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestGeneration(pub u64);

impl fmt::Display for RequestGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Commit {
    Applied,
    Stale { latest: RequestGeneration },
    Rejected(TransitionError),
}

#[derive(Debug, Default)]
pub struct ResolutionMachine {
    state: ResolutionState,
    latest: Option<RequestGeneration>,
}

impl ResolutionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    pub fn latest_generation(&self) -> Option<RequestGeneration> {
        self.latest
    }

    /// Enters `Loading`, dropping whatever result was shown, and hands out the
    /// generation the caller must tag its request with.
    pub fn submit(&mut self) -> RequestGeneration {
        let generation = RequestGeneration(self.latest.map_or(1, |g| g.0 + 1));
        self.latest = Some(generation);
        self.state = ResolutionState::Loading;
        debug!(%generation, "riddle submitted");
        generation
    }

    pub fn resolve(
        &mut self,
        generation: RequestGeneration,
        outcome: Result<Payload, ResolutionFailure>,
    ) -> Commit {
        let Some(latest) = self.latest.filter(|latest| *latest == generation) else {
            let latest = self.latest.unwrap_or(RequestGeneration(0));
            warn!(%generation, %latest, "discarding stale riddle response");
            return Commit::Stale { latest };
        };

        match self.state.apply(ResolutionEvent::Resolved(outcome)) {
            Ok(next) => {
                debug!(generation = %latest, state = next.name(), "riddle resolved");
                self.state = next;
                Commit::Applied
            }
            Err(err) => {
                warn!(%generation, "rejected riddle response: {err}");
                Commit::Rejected(err)
            }
        }
    }
}
