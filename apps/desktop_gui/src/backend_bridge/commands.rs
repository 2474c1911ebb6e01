//! Backend commands queued from UI to backend worker.

use client_core::RequestGeneration;
use shared::domain::RiddleParameters;

#[derive(Debug)]
pub enum BackendCommand {
    Solve {
        generation: RequestGeneration,
        params: RiddleParameters,
    },
    CheckHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Solve { .. } => "solve",
            Self::CheckHealth => "check_health",
        }
    }
}
