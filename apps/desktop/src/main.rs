use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, render,
    view::{ErrorPanel, OperationTable, CALCULATING_LABEL, TABLE_HEADERS, TITLE},
    Commit, ResolutionFailure, ResolutionMachine, ResolutionState, ResolutionView, RiddleClient,
    RiddleService,
};
use shared::domain::RiddleParameters;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "riddle_cli", about = "Ask the water jug riddle solver from a terminal")]
struct Args {
    /// Solver base URL; overrides riddle.toml and the environment.
    #[arg(long, global = true)]
    endpoint: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit X, Y and Z exactly as typed and print the operations.
    Solve {
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        x: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        y: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        z: String,
    },
    /// Check that the solver answers on its health endpoint.
    Health,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings()
        .context("failed to load settings")?
        .with_endpoint_override(args.endpoint);
    let client = RiddleClient::from_settings(&settings)?;

    match args.command {
        Command::Solve { x, y, z } => solve(&client, RiddleParameters::new(x, y, z)).await,
        Command::Health => match client.health().await {
            Ok(()) => {
                println!("solver at {} is reachable", client.endpoint());
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                warn!(endpoint = %client.endpoint(), status = ?err.status(), "solver is unreachable: {err}");
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

async fn solve(client: &RiddleClient, params: RiddleParameters) -> Result<ExitCode> {
    let mut machine = ResolutionMachine::new();
    let generation = machine.submit();
    eprintln!("{}", render_text(&render(machine.state())));

    let outcome = client.solve(&params).await.map_err(ResolutionFailure::from);
    if let Commit::Rejected(err) = machine.resolve(generation, outcome) {
        anyhow::bail!("resolution rejected: {err}");
    }

    match machine.state() {
        ResolutionState::Success(payload) => {
            info!(%generation, total_steps = payload.total_steps(), "riddle resolved")
        }
        ResolutionState::Failure(failure) => warn!(
            %generation,
            kind = ?failure.kind,
            "riddle failed: {}: {}",
            failure.error.message,
            failure.error.description
        ),
        other => warn!(%generation, state = other.name(), "riddle left unresolved"),
    }

    let view = render(machine.state());
    println!("{}", render_text(&view));
    Ok(match view {
        ResolutionView::Table(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn render_text(view: &ResolutionView) -> String {
    match view {
        ResolutionView::Hidden => String::new(),
        ResolutionView::Calculating => CALCULATING_LABEL.to_string(),
        ResolutionView::Table(table) => table_text(table),
        ResolutionView::ErrorPanel(panel) => [
            ErrorPanel::TITLE.to_string(),
            ErrorPanel::LEAD.to_string(),
            panel.message_line(),
            panel.description_line(),
        ]
        .join("\n"),
    }
}

fn table_text(table: &OperationTable) -> String {
    // `{:<width$}` pads by chars, so widths are measured in chars too.
    let mut widths = TABLE_HEADERS.map(|header| header.chars().count());
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![TITLE.to_string(), line(TABLE_HEADERS)];
    out.extend(table.rows.iter().map(|row| line(row.cells())));
    out.push(table.target_header());
    out.join("\n")
}
