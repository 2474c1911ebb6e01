use std::fmt;

/// Opaque jug label as reported by the solver (`"x"`, `"y"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JugId(pub String);

impl JugId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three capacities exactly as the user typed them. Nothing is parsed or
/// trimmed before submission; the solver owns validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiddleParameters {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl RiddleParameters {
    pub fn new(x: impl Into<String>, y: impl Into<String>, z: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [("x", &self.x), ("y", &self.y), ("z", &self.z)]
    }
}
