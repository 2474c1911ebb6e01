//! Command orchestration helpers from UI actions to backend command queue.

use client_core::{FailureKind, RequestGeneration, ResolutionFailure, ResolutionMachine};
use crossbeam_channel::{Sender, TrySendError};
use shared::error::ServiceError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::params::ParameterStore;

/// Queues `cmd` without blocking the UI thread. Returns whether it was queued;
/// on failure `status` explains why.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure)"
                    .to_string();
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            false
        }
    }
}

/// Submits the current form values. The resolution enters `Loading` right away;
/// if the request cannot even be queued it fails immediately instead of hanging.
pub fn submit_riddle(
    params: &ParameterStore,
    resolution: &mut ResolutionMachine,
    cmd_tx: &Sender<BackendCommand>,
    status: &mut String,
) -> RequestGeneration {
    let generation = resolution.submit();
    *status = "Calculating...".to_string();
    let queued = dispatch_backend_command(
        cmd_tx,
        BackendCommand::Solve {
            generation,
            params: params.snapshot(),
        },
        status,
    );
    if !queued {
        let failure = ResolutionFailure {
            kind: FailureKind::Transport,
            error: ServiceError::new("transport error", status.clone()),
        };
        let _ = resolution.resolve(generation, Err(failure));
    }
    generation
}
