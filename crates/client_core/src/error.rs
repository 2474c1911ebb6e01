use shared::error::{DecodeError, ServiceError};
use thiserror::Error;

/// Everything that can go wrong between issuing a riddle request and holding a
/// decoded [`shared::protocol::Payload`].
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("endpoint '{0}' cannot be used as a base url")]
    Endpoint(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("solver returned status {status}: {}", error.message)]
    Service { status: u16, error: ServiceError },
    #[error("malformed solver response (status {status}): {source}")]
    Decode { status: u16, source: DecodeError },
}

impl SolveError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } | Self::Decode { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            Self::Endpoint(_) => None,
        }
    }
}
