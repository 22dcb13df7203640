//! Docket CLI Application
//!
//! Command-line interface for the Docket legal case assistant.

mod args;
mod cli;
mod handler;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use docket_core::{Config, DeskBuilder};
use handler::Cli;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        api_url,
        no_color,
        command,
    } = Args::parse();

    let config = Config::load().context("Failed to load configuration")?;

    let desk = DeskBuilder::new()
        .with_config(config)
        .with_database_path(database_file)
        .with_base_url(api_url)
        .build()
        .await
        .context("Failed to initialize docket")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Docket started");

    let cli = Cli::new(desk, renderer);
    let outcome = match command {
        Some(Auth { command }) => cli.handle_auth_command(command).await,
        Some(Jurisdiction { command }) => cli.handle_jurisdiction_command(command).await,
        Some(Case { command }) => cli.handle_case_command(command).await,
        Some(Step { command }) => cli.handle_step_command(command).await,
        Some(Chat { command }) => cli.handle_chat_command(command).await,
        Some(Draft { command }) => cli.handle_draft_command(command).await,
        Some(Evidence { command }) => cli.handle_evidence_command(command).await,
        None => cli.list_cases().await,
    };

    // Background writes must land even when the command itself failed.
    cli.finish().await?;
    outcome
}
