//! Events flowing from the backend worker to the UI thread.

use client_core::{RequestGeneration, ResolutionFailure};
use shared::protocol::Payload;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    BackendFailure(String),
    Resolved {
        generation: RequestGeneration,
        outcome: Result<Payload, ResolutionFailure>,
    },
    Health(Result<(), String>),
}
