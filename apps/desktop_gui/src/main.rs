use std::sync::Arc;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context};
use backend_bridge::commands::BackendCommand;
use clap::Parser;
use client_core::{load_settings, view::TITLE, RiddleClient};
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::RiddleApp;

#[derive(Parser, Debug)]
#[command(name = "riddle_gui", about = "Desktop client for the water jug riddle solver")]
struct Args {
    /// Solver base URL; overrides riddle.toml and the environment.
    #[arg(long)]
    endpoint: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let settings = load_settings()
        .context("failed to load settings")?
        .with_endpoint_override(args.endpoint);
    let client = RiddleClient::from_settings(&settings)?;
    let endpoint = client.endpoint().to_string();
    tracing::info!(%endpoint, "using riddle solver");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, Arc::new(client));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        TITLE,
        options,
        Box::new(move |_cc| {
            let mut app = RiddleApp::new(cmd_tx, ui_rx, endpoint);
            app.request_health_check();
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow!("desktop gui exited with error: {err}"))
}
