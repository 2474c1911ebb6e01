//! Pure projection of a [`ResolutionState`] into what the user sees.

use shared::protocol::{Operation, Payload};

use crate::resolution::{ResolutionFailure, ResolutionState};

pub const TITLE: &str = "Water Jug Riddle";
pub const SUBMIT_LABEL: &str = "Calculate Operations";
pub const CALCULATING_LABEL: &str = "Calculating!";
pub const TABLE_HEADERS: [&str; 4] = ["Step Number", "Operation Type", "Jugs", "Amount of Water"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionView {
    /// Nothing submitted yet: only the form is shown.
    Hidden,
    Calculating,
    Table(OperationTable),
    ErrorPanel(ErrorPanel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRow {
    pub step: String,
    pub operation: String,
    pub jugs: String,
    pub amount: String,
}

impl OperationRow {
    pub fn cells(&self) -> [&str; 4] {
        [&self.step, &self.operation, &self.jugs, &self.amount]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTable {
    pub rows: Vec<OperationRow>,
    pub target_jug: String,
}

impl OperationTable {
    pub fn target_header(&self) -> String {
        format!("Jug with desired amount of water: {}", self.target_jug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub message: String,
    pub description: String,
}

impl ErrorPanel {
    pub const TITLE: &'static str = "Error";
    pub const LEAD: &'static str = "Following error was returned by the server:";

    pub fn message_line(&self) -> String {
        format!("MESSAGE: {}", self.message)
    }

    pub fn description_line(&self) -> String {
        format!("DESCRIPTION: {}", self.description)
    }
}

pub fn render(state: &ResolutionState) -> ResolutionView {
    match state {
        ResolutionState::Idle => ResolutionView::Hidden,
        ResolutionState::Loading => ResolutionView::Calculating,
        ResolutionState::Success(payload) => ResolutionView::Table(render_table(payload)),
        ResolutionState::Failure(failure) => ResolutionView::ErrorPanel(render_error(failure)),
    }
}

fn render_table(payload: &Payload) -> OperationTable {
    OperationTable {
        rows: payload.operations().iter().map(render_row).collect(),
        target_jug: payload.jug().as_str().to_uppercase(),
    }
}

fn render_row(operation: &Operation) -> OperationRow {
    let jugs = match operation {
        Operation::Fill { jug, .. } | Operation::Empty { jug, .. } => jug.as_str().to_uppercase(),
        Operation::Pour {
            origin,
            destination,
            ..
        } => format!(
            "{} to {}",
            origin.as_str().to_uppercase(),
            destination.as_str().to_uppercase()
        ),
    };
    OperationRow {
        step: format!("#{}", operation.step()),
        operation: operation.kind().wire_label().to_uppercase(),
        jugs,
        amount: operation.amount().to_string(),
    }
}

fn render_error(failure: &ResolutionFailure) -> ErrorPanel {
    ErrorPanel {
        message: failure.error.message.to_uppercase(),
        description: failure.error.description.to_uppercase(),
    }
}
