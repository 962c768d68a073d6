//! Per-session prompt storage.
//!
//! Each session gets a directory under the data root:
//!
//! ```text
//! <root>/<session_id>/most-recent-prompt.txt   verbatim last prompt
//! <root>/<session_id>/error_log.log            hook failures, one per line
//! ```
//!
//! The root defaults to `~/.claude/session_data`.

use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

const PROMPT_FILE: &str = "most-recent-prompt.txt";
const ERROR_LOG: &str = "error_log.log";
/// Directory used for errors that arrive without a usable session id.
const UNKNOWN_SESSION: &str = "unknown";

/// Handle on the session data root.
#[derive(Debug, Clone)]
pub struct PromptStore {
    root: PathBuf,
}

impl PromptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The default root, `$HOME/.claude/session_data`.
    pub fn default_root() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME not set; use --data-dir")?;
        Ok(PathBuf::from(home).join(".claude").join("session_data"))
    }

    // ── Path helpers ────────────────────────────────────────────────────

    fn session_dir(&self, session_id: &str) -> Option<PathBuf> {
        is_plain_component(session_id).then(|| self.root.join(session_id))
    }

    fn prompt_path(&self, session_id: &str) -> Option<PathBuf> {
        Some(self.session_dir(session_id)?.join(PROMPT_FILE))
    }

    // ── Public API ──────────────────────────────────────────────────────

    /// Most recent prompt for the session, stripped of surrounding whitespace.
    ///
    /// Any failure (no id, no file, unreadable file) reads as `None`.
    pub async fn read(&self, session_id: Option<&str>) -> Option<String> {
        let path = self.prompt_path(session_id?)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Some(text.trim().to_string()),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no stored prompt");
                None
            }
        }
    }

    /// Store `prompt` verbatim as the session's most recent prompt.
    pub fn write(&self, session_id: &str, prompt: &str) -> Result<PathBuf> {
        let dir = self
            .session_dir(session_id)
            .with_context(|| format!("invalid session id {session_id:?}"))?;
        fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(PROMPT_FILE);
        fs::write(&path, prompt).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Append a timestamped line to the session's error log.
    ///
    /// Errors without a usable session id go to the `unknown` session.
    pub fn log_error(&self, session_id: Option<&str>, message: &str) -> Result<()> {
        let dir = session_id
            .and_then(|id| self.session_dir(id))
            .unwrap_or_else(|| self.root.join(UNKNOWN_SESSION));
        fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

        let path = dir.join(ERROR_LOG);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let timestamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f");
        writeln!(file, "[{timestamp}] {message}")
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Whether `id` can be used as a single directory name under the root.
fn is_plain_component(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\', '\0'])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn write_then_read_round_trips_stripped() {
        let root = TempDir::new().unwrap();
        let store = PromptStore::new(root.path());

        let path = store.write("S", "  refactor the parser\n\n").unwrap();
        assert_eq!(path, root.path().join("S").join(PROMPT_FILE));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "  refactor the parser\n\n"
        );
        assert_eq!(
            store.read(Some("S")).await.as_deref(),
            Some("refactor the parser")
        );
    }

    #[tokio::test]
    async fn write_overwrites_previous_prompt() {
        let root = TempDir::new().unwrap();
        let store = PromptStore::new(root.path());

        store.write("S", "first").unwrap();
        store.write("S", "second").unwrap();
        assert_eq!(store.read(Some("S")).await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn unknown_or_missing_session_reads_none() {
        let root = TempDir::new().unwrap();
        let store = PromptStore::new(root.path());

        assert_eq!(store.read(Some("never-written")).await, None);
        assert_eq!(store.read(None).await, None);
    }

    #[tokio::test]
    async fn missing_root_reads_none() {
        let store = PromptStore::new("/nonexistent/glance/session_data");
        assert_eq!(store.read(Some("S")).await, None);
    }

    #[tokio::test]
    async fn path_like_session_ids_are_rejected() {
        let root = TempDir::new().unwrap();
        let store = PromptStore::new(root.path().join("data"));
        fs::write(root.path().join(PROMPT_FILE), "outside").unwrap();

        assert!(store.write("../escape", "x").is_err());
        assert!(store.write("..", "x").is_err());
        assert!(store.write("", "x").is_err());
        assert_eq!(store.read(Some("..")).await, None);
        assert_eq!(store.read(Some("a/b")).await, None);
    }

    #[test]
    fn log_error_appends_timestamped_lines() {
        let root = TempDir::new().unwrap();
        let store = PromptStore::new(root.path());

        store.log_error(Some("S"), "first failure").unwrap();
        store.log_error(Some("S"), "second failure").unwrap();

        let log = fs::read_to_string(root.path().join("S").join(ERROR_LOG)).unwrap();
        let lines: Vec<_> = log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] first failure"));
        assert!(lines[1].ends_with("] second failure"));
    }

    #[test]
    fn log_error_without_session_uses_unknown() {
        let root = TempDir::new().unwrap();
        let store = PromptStore::new(root.path());

        store.log_error(None, "no id").unwrap();
        store.log_error(Some("../bad"), "bad id").unwrap();

        let log = fs::read_to_string(root.path().join(UNKNOWN_SESSION).join(ERROR_LOG)).unwrap();
        assert_eq!(log.lines().count(), 2);
    }
}
