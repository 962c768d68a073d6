use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

/// Why a single git query produced no result.
///
/// The probe treats every variant the same way; the distinction only shows
/// up in logs.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("failed to run git: {0}")]
    Launch(#[from] std::io::Error),
    #[error("git {args} timed out after {timeout:?}")]
    Timeout { args: String, timeout: Duration },
    #[error("git {args} exited with {code:?}")]
    Failed { args: String, code: Option<i32> },
}

/// Capability to run one git query against a directory.
///
/// On success the trimmed stdout is returned.
pub trait GitRunner {
    fn run(
        &self,
        args: &[&str],
        dir: &Path,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, QueryError>> + Send;
}

/// Runs the real `git` binary.
#[derive(Debug, Clone)]
pub struct LiveGit {
    program: PathBuf,
}

impl LiveGit {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }

    /// Use a specific git executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for LiveGit {
    fn default() -> Self {
        Self::new()
    }
}

impl GitRunner for LiveGit {
    async fn run(&self, args: &[&str], dir: &Path, timeout: Duration) -> Result<String, QueryError> {
        let child = Command::new(&self.program)
            .arg("-C")
            .arg(dir)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| QueryError::Timeout {
                args: args.join(" "),
                timeout,
            })??;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(QueryError::Failed {
                args: args.join(" "),
                code: output.status.code(),
            })
        }
    }
}
