use shared::domain::RiddleParameters;

/// Raw form input. Setters are independent and never touch the resolution
/// state; any string, including an empty one, is accepted.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    values: RiddleParameters,
}

impl ParameterStore {
    pub fn x(&self) -> &str {
        &self.values.x
    }

    pub fn y(&self) -> &str {
        &self.values.y
    }

    pub fn z(&self) -> &str {
        &self.values.z
    }

    pub fn set_x(&mut self, value: impl Into<String>) {
        self.values.x = value.into();
    }

    pub fn set_y(&mut self, value: impl Into<String>) {
        self.values.y = value.into();
    }

    pub fn set_z(&mut self, value: impl Into<String>) {
        self.values.z = value.into();
    }

    pub fn snapshot(&self) -> RiddleParameters {
        self.values.clone()
    }
}
