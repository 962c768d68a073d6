mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use glance::commands;
use glance::commands::status::StatusOptions;
use glance::config::{self, Config};
use glance::display::theme::Palette;
use glance::prompt_store::PromptStore;
use glance::vcs::LiveGit;
use tokio::io::AsyncReadExt;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Status) {
        Command::Status => {
            status(&cli).await;
            Ok(ExitCode::SUCCESS)
        }
        Command::SavePrompt => save_prompt(&cli).await,
    }
}

/// Log to stderr only; stdout is reserved for the status line.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("GLANCE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the status line. Nothing here may fail the process.
async fn status(cli: &Cli) {
    let config = load_config(cli).unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "ignoring config");
        Config::default()
    });
    let store = match data_root(cli, &config) {
        Ok(root) => Some(PromptStore::new(root)),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "prompt storage unavailable");
            None
        }
    };
    let input = read_stdin().await.unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "failed to read stdin");
        String::new()
    });

    let options = StatusOptions {
        store,
        git_timeout: config.git_timeout(),
        palette: Palette::ansi(),
    };
    if let Err(e) =
        commands::status::status(input, LiveGit::new(), options, &mut std::io::stdout()).await
    {
        warn!(error = %format!("{e:#}"), "failed to write status line");
    }
}

async fn save_prompt(cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli)?;
    let store = PromptStore::new(data_root(cli, &config)?);
    let input = read_stdin().await?;

    match commands::save_prompt::save_prompt(&input, &store, &mut std::io::stdout()) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// `--config`, else the default path when `HOME` is known, else defaults.
fn load_config(cli: &Cli) -> Result<Config> {
    match cli.config.clone().or_else(|| config::default_path().ok()) {
        Some(path) => config::load(&path),
        None => Ok(Config::default()),
    }
}

/// `--data-dir`, else the config file's `data_dir`, else `~/.claude/session_data`.
fn data_root(cli: &Cli, config: &Config) -> Result<PathBuf> {
    match cli.data_dir.clone().or_else(|| config.data_dir.clone()) {
        Some(root) => Ok(root),
        None => PromptStore::default_root(),
    }
}

async fn read_stdin() -> Result<String> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read stdin")?;
    Ok(input)
}
