use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "glance",
    about = "One-line status for Claude Code: directory, git, cost and last prompt",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Root directory for per-session prompt storage. Default: ~/.claude/session_data.
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file. Default: ~/.claude/glance.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Command {
    /// Print the status line for the statusLine JSON on stdin (the default).
    Status,

    /// Store the prompt from a UserPromptSubmit hook payload on stdin.
    SavePrompt,
}
