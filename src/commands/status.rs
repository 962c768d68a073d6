use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::warn;

use crate::display::line;
use crate::display::sections;
use crate::display::theme::Palette;
use crate::prompt_store::PromptStore;
use crate::protocol::parse::parse_request;
use crate::vcs::{self, DEFAULT_TIMEOUT, GitRunner};

/// Everything the status line needs besides the request and git.
#[derive(Debug, Clone)]
pub struct StatusOptions {
    /// Where prompts are stored; `None` shows no prompt.
    pub store: Option<PromptStore>,
    pub git_timeout: Duration,
    pub palette: Palette,
}

impl Default for StatusOptions {
    fn default() -> Self {
        Self {
            store: None,
            git_timeout: DEFAULT_TIMEOUT,
            palette: Palette::ansi(),
        }
    }
}

/// Render the status line for one request and print it.
///
/// Always writes exactly one line. Anything that stops the line from being
/// built, including a panic while building it, prints the degraded line.
pub async fn status<R>(
    raw_input: String,
    runner: R,
    options: StatusOptions,
    writer: &mut impl Write,
) -> Result<()>
where
    R: GitRunner + Send + Sync + 'static,
{
    let palette = options.palette;
    let line = tokio::spawn(async move { render_line(&raw_input, &runner, &options).await })
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "status line task failed");
            line::degraded(palette)
        });
    writeln!(writer, "{line}")?;
    writer.flush()?;
    Ok(())
}

/// Build the status line (without newline) for a raw JSON request.
pub async fn render_line<R: GitRunner>(raw_input: &str, runner: &R, options: &StatusOptions) -> String {
    match build_line(raw_input, runner, options).await {
        Ok(line) => line,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "status line degraded");
            line::degraded(options.palette)
        }
    }
}

async fn build_line<R: GitRunner>(
    raw_input: &str,
    runner: &R,
    options: &StatusOptions,
) -> Result<String> {
    let request = parse_request(raw_input)?;
    let probe_dir = probe_dir(request.cwd(), std::env::current_dir);

    let probe_vcs = async {
        match &probe_dir {
            Some(dir) => vcs::probe(runner, dir, options.git_timeout).await,
            None => None,
        }
    };
    let read_prompt = async {
        match &options.store {
            Some(store) => store.read(request.session_id()).await,
            None => None,
        }
    };
    let (vcs_state, prompt) = tokio::join!(probe_vcs, read_prompt);

    let palette = options.palette;
    Ok(line::compose(
        &sections::directory(request.cwd(), palette),
        &sections::vcs(vcs_state.as_ref(), palette),
        &sections::cost(Some(request.total_cost()), palette),
        &sections::prompt(prompt.as_deref(), palette),
        palette,
    ))
}

/// Directory to probe: the request's `cwd`, else the process's own.
///
/// `None` when neither is known; the line then shows no git section.
fn probe_dir(
    cwd: Option<&str>,
    current_dir: impl FnOnce() -> std::io::Result<PathBuf>,
) -> Option<PathBuf> {
    if let Some(cwd) = cwd {
        return Some(PathBuf::from(cwd));
    }
    match current_dir() {
        Ok(dir) => Some(dir),
        Err(e) => {
            warn!(error = %e, "no working directory to probe");
            None
        }
    }
}
