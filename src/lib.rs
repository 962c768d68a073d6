//! One-line status summary for Claude Code sessions.
//!
//! The status command combines the working directory, git state, session
//! cost and the last prompt into a single colored line. The `save-prompt`
//! hook stores that last prompt per session.

pub mod commands;
pub mod config;
pub mod display;
pub mod prompt_store;
pub mod protocol;
pub mod vcs;
