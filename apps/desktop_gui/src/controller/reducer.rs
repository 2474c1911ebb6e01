//! Applies backend events to UI-owned state. Runs on the UI thread only.

use client_core::{Commit, ResolutionMachine, ResolutionState};

use crate::controller::events::UiEvent;

pub fn apply_ui_event(resolution: &mut ResolutionMachine, status: &mut String, event: UiEvent) {
    match event {
        UiEvent::Info(message) => {
            *status = message;
        }
        UiEvent::BackendFailure(message) => {
            tracing::error!("{message}");
            *status = message;
        }
        UiEvent::Health(Ok(())) => {
            *status = "Solver reachable".to_string();
        }
        UiEvent::Health(Err(err)) => {
            tracing::warn!("solver health check failed: {err}");
            *status = format!("Solver unreachable: {err}");
        }
        UiEvent::Resolved {
            generation,
            outcome,
        } => match resolution.resolve(generation, outcome) {
            Commit::Applied => {
                *status = match resolution.state() {
                    ResolutionState::Success(payload) => {
                        format!("Solved in {} steps", payload.total_steps())
                    }
                    ResolutionState::Failure(_) => "Solver returned an error".to_string(),
                    other => format!("Unexpected state after response: {}", other.name()),
                };
            }
            Commit::Stale { latest } => {
                tracing::debug!(%generation, %latest, "ignored superseded riddle response");
            }
            Commit::Rejected(err) => {
                tracing::warn!(%generation, "riddle response rejected: {err}");
            }
        },
    }
}
