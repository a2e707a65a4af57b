//! `carnet` — command-line client for a remote contact service.
//!
//! # Usage
//!
//! ```
//! carnet list --query dupont
//! carnet add --first-name Jean --last-name Dupont --email jean@x.com --phone 0600000000
//! carnet --url http://contacts:8080/api shell
//! ```

mod commands;
mod display;
mod settings;
mod shell;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use carnet_client::ApiClient;
use carnet_store::ContactStore;
use clap::{Parser, Subcommand};
use commands::Command;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "carnet", version, about = "Command-line client for a remote contact service")]
struct Args {
  /// Path to a TOML config file (base_url, timeout_secs, notice lifetimes).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the contact API (default: http://localhost:8080/api).
  #[arg(long)]
  url: Option<String>,

  /// Request timeout in seconds.
  #[arg(long, value_name = "SECS")]
  timeout: Option<u64>,

  #[command(subcommand)]
  command: TopCommand,
}

#[derive(Subcommand, Debug)]
enum TopCommand {
  #[command(flatten)]
  Contact(Command),
  /// Start an interactive session.
  Shell,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // CLI flags override the config file and environment, which override defaults.
  let mut settings = Settings::load(args.config.as_deref())?;
  if let Some(url) = args.url {
    settings.base_url = url;
  }
  if let Some(secs) = args.timeout {
    settings.timeout_secs = Some(secs);
  }
  tracing::debug!(?settings, "configuration loaded");

  let client = ApiClient::new(settings.api_config()).context("building HTTP client")?;
  let mut store = ContactStore::with_config(client, settings.store_config());

  match args.command {
    TopCommand::Shell => shell::run(&mut store).await,
    TopCommand::Contact(command) => {
      if command.needs_contacts() {
        commands::load(&mut store).await?;
      }
      let mut stdout = io::stdout();
      commands::run(&mut store, command, &mut stdout).await?;
      display::notices(&mut stdout, &mut io::stderr(), &store)?;
      Ok(())
    }
  }
}
