//! Runtime bridge between UI command queue and backend event intake.
//!
//! The worker owns a tokio runtime and spawns one task per riddle request, so a
//! second submit never waits for the first. Which response may commit is decided
//! on the UI side by the request generation.

use std::{sync::Arc, thread};

use client_core::{ResolutionFailure, RiddleService};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{debug, error, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    service: Arc<dyn RiddleService>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailure(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                debug!(command = cmd.name(), "backend received command");
                let service = Arc::clone(&service);
                let ui_tx = ui_tx.clone();
                match cmd {
                    BackendCommand::Solve { generation, params } => {
                        tokio::spawn(async move {
                            let outcome = service
                                .solve(&params)
                                .await
                                .map_err(ResolutionFailure::from);
                            deliver(ui_tx, UiEvent::Resolved {
                                generation,
                                outcome,
                            })
                            .await;
                        });
                    }
                    BackendCommand::CheckHealth => {
                        tokio::spawn(async move {
                            let outcome = service.health().await.map_err(|err| err.to_string());
                            deliver(ui_tx, UiEvent::Health(outcome)).await;
                        });
                    }
                }
            }
            debug!("ui command queue closed; backend worker stopping");
        });
    })
}

/// Hands a backend result to the UI. A full queue waits on the blocking pool
/// until the UI drains it, so a response is only lost once the UI is gone.
async fn deliver(ui_tx: Sender<UiEvent>, event: UiEvent) {
    let event = match ui_tx.try_send(event) {
        Ok(()) => return,
        Err(TrySendError::Full(event)) => event,
        Err(TrySendError::Disconnected(_)) => {
            warn!("ui event queue disconnected; dropping backend event");
            return;
        }
    };
    debug!("ui event queue full; waiting for the ui to drain it");
    match tokio::task::spawn_blocking(move || ui_tx.send(event)).await {
        Ok(Ok(())) => {}
        Ok(Err(_)) => warn!("ui event queue disconnected; dropping backend event"),
        Err(err) => error!("ui event delivery task failed: {err}"),
    }
}
