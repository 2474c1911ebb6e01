use serde::Deserialize;
use serde_json::Number;

use crate::{
    domain::JugId,
    error::{DecodeError, ServiceError},
};

pub const RIDDLE_PATH: [&str; 3] = ["api", "v1", "riddle"];
pub const HEALTH_PATH: [&str; 3] = ["api", "v1", "health"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Fill,
    Empty,
    Pour,
}

impl OperationKind {
    pub fn wire_label(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Empty => "empty",
            Self::Pour => "pour",
        }
    }

    fn from_wire(label: &str) -> Option<Self> {
        match label {
            "fill" => Some(Self::Fill),
            "empty" => Some(Self::Empty),
            "pour" => Some(Self::Pour),
            _ => None,
        }
    }
}

/// One solver step. Amounts keep the raw JSON number so they render as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Fill {
        step: u32,
        jug: JugId,
        amount: Number,
    },
    Empty {
        step: u32,
        jug: JugId,
        amount: Number,
    },
    Pour {
        step: u32,
        origin: JugId,
        destination: JugId,
        amount: Number,
    },
}

impl Operation {
    pub fn step(&self) -> u32 {
        match self {
            Self::Fill { step, .. } | Self::Empty { step, .. } | Self::Pour { step, .. } => *step,
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Fill { .. } => OperationKind::Fill,
            Self::Empty { .. } => OperationKind::Empty,
            Self::Pour { .. } => OperationKind::Pour,
        }
    }

    pub fn amount(&self) -> &Number {
        match self {
            Self::Fill { amount, .. } | Self::Empty { amount, .. } | Self::Pour { amount, .. } => {
                amount
            }
        }
    }
}

/// A decoded solution. Steps are contiguous from 1 and `total_steps` equals the
/// number of operations; both are checked on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    jug: JugId,
    operations: Vec<Operation>,
    total_steps: u32,
}

impl Payload {
    pub fn new(jug: JugId, operations: Vec<Operation>) -> Result<Self, DecodeError> {
        let total_steps =
            u32::try_from(operations.len()).map_err(|_| DecodeError::StepCountMismatch {
                total_steps: u32::MAX,
                operations: operations.len(),
            })?;
        Self::from_parts(jug, operations, total_steps)
    }

    fn from_parts(
        jug: JugId,
        operations: Vec<Operation>,
        total_steps: u32,
    ) -> Result<Self, DecodeError> {
        for (index, operation) in operations.iter().enumerate() {
            let expected = index as u32 + 1;
            if operation.step() != expected {
                return Err(DecodeError::StepOutOfOrder {
                    index,
                    expected,
                    found: operation.step(),
                });
            }
        }
        if total_steps as usize != operations.len() {
            return Err(DecodeError::StepCountMismatch {
                total_steps,
                operations: operations.len(),
            });
        }
        Ok(Self {
            jug,
            operations,
            total_steps,
        })
    }

    /// Jug that ends up holding the requested amount.
    pub fn jug(&self) -> &JugId {
        &self.jug
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }
}

// The solver omits zero values and empty strings, so everything but `step` and
// `operation` may be absent.
#[derive(Debug, Deserialize)]
struct WirePayload {
    #[serde(default)]
    jug: String,
    #[serde(default)]
    operations: Vec<WireOperation>,
    #[serde(default)]
    total_steps: u32,
}

#[derive(Debug, Deserialize)]
struct WireOperation {
    step: u32,
    operation: String,
    jug: Option<String>,
    jug_origin: Option<String>,
    jug_destination: Option<String>,
    amount: Option<Number>,
}

impl WireOperation {
    fn into_operation(self) -> Result<Operation, DecodeError> {
        let step = self.step;
        let Some(kind) = OperationKind::from_wire(&self.operation) else {
            return Err(DecodeError::UnknownOperation {
                step,
                label: self.operation,
            });
        };
        let amount = self.amount.unwrap_or_else(|| Number::from(0));

        match (kind, self.jug, self.jug_origin, self.jug_destination) {
            (OperationKind::Fill, Some(jug), None, None) => Ok(Operation::Fill {
                step,
                jug: JugId(jug),
                amount,
            }),
            (OperationKind::Empty, Some(jug), None, None) => Ok(Operation::Empty {
                step,
                jug: JugId(jug),
                amount,
            }),
            (OperationKind::Pour, None, Some(origin), Some(destination)) => {
                if origin == destination {
                    return Err(DecodeError::SameJugPour { step, jug: origin });
                }
                Ok(Operation::Pour {
                    step,
                    origin: JugId(origin),
                    destination: JugId(destination),
                    amount,
                })
            }
            (kind, jug, origin, destination) => Err(DecodeError::ShapeMismatch {
                step,
                label: kind.wire_label().to_string(),
                found: describe_shape(jug.is_some(), origin.is_some(), destination.is_some()),
                expected: match kind {
                    OperationKind::Fill | OperationKind::Empty => "a single jug",
                    OperationKind::Pour => "a jug_origin/jug_destination pair",
                },
            }),
        }
    }
}

fn describe_shape(has_jug: bool, has_origin: bool, has_destination: bool) -> &'static str {
    match (has_jug, has_origin || has_destination, has_origin && has_destination) {
        (true, true, _) => "both jug and jug_origin/jug_destination",
        (true, false, _) => "a single jug",
        (false, false, _) => "neither jug nor jug_origin/jug_destination",
        (false, true, true) => "a jug_origin/jug_destination pair",
        (false, true, false) => "an incomplete jug_origin/jug_destination pair",
    }
}

/// Decodes a 2xx solver body into a checked [`Payload`].
pub fn decode(body: &[u8]) -> Result<Payload, DecodeError> {
    let wire: WirePayload = serde_json::from_slice(body)?;
    let operations = wire
        .operations
        .into_iter()
        .map(WireOperation::into_operation)
        .collect::<Result<Vec<_>, _>>()?;
    Payload::from_parts(JugId(wire.jug), operations, wire.total_steps)
}

#[derive(Debug, Deserialize)]
struct WireServiceError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    description: String,
}

/// Decodes a non-2xx solver body. Missing fields become empty strings; a body
/// that is not a JSON object is rejected.
pub fn decode_error(body: &[u8]) -> Result<ServiceError, DecodeError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(DecodeError::ErrorBodyNotObject);
    }
    let wire: WireServiceError = serde_json::from_value(value)?;
    Ok(ServiceError {
        message: wire.message,
        description: wire.description,
    })
}
