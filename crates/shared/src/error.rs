use thiserror::Error;

/// Structured error body returned by the solver on a non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceError {
    pub message: String,
    pub description: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            description: description.into(),
        }
    }
}

/// A solver body that does not honour the wire contract.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed json body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("error body is not a json object")]
    ErrorBodyNotObject,
    #[error("operation at step {step} has unknown label '{label}'")]
    UnknownOperation { step: u32, label: String },
    #[error("operation at step {step} labelled '{label}' has {found}, expected {expected}")]
    ShapeMismatch {
        step: u32,
        label: String,
        found: &'static str,
        expected: &'static str,
    },
    #[error("pour at step {step} uses jug '{jug}' as both origin and destination")]
    SameJugPour { step: u32, jug: String },
    #[error("operation at index {index} has step {found}, expected {expected}")]
    StepOutOfOrder {
        index: usize,
        expected: u32,
        found: u32,
    },
    #[error("total_steps is {total_steps} but {operations} operations were returned")]
    StepCountMismatch { total_steps: u32, operations: usize },
}
