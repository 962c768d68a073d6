//! Git state for the status line.
//!
//! Every query goes through [`GitRunner`] and every failure (launch error,
//! non-zero exit, timeout) degrades to that query's default. Only the first
//! query, repository detection, can make the whole probe come back empty.

mod runner;

use std::path::Path;
use std::time::Duration;

use tracing::debug;

pub use runner::{GitRunner, LiveGit, QueryError};

/// Per-query bound used when no configuration says otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Snapshot of the repository containing the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsState {
    /// Branch name, `HEAD@<short-hash>` when detached, or `unknown`.
    pub branch: String,
    pub is_clean: bool,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub ahead: u32,
    pub behind: u32,
}

/// Probe the repository at `dir`.
///
/// Returns `None` when `dir` is not inside a git repository (or git can't
/// tell us). Otherwise every field is populated, falling back to its default
/// when the query behind it fails.
pub async fn probe<R: GitRunner>(runner: &R, dir: &Path, timeout: Duration) -> Option<VcsState> {
    let git = Queries {
        runner,
        dir,
        timeout,
    };

    git.query(&["rev-parse", "--git-dir"]).await?;

    let branch = git.branch().await;

    // A failed status query reads as clean: never show dirt we didn't see.
    let is_clean = git
        .query(&["status", "--porcelain"])
        .await
        .is_none_or(|out| out.is_empty());

    let (lines_added, lines_removed) = git
        .query(&["diff", "--numstat"])
        .await
        .map_or((0, 0), |out| sum_numstat(&out));

    let (ahead, behind) = git.ahead_behind().await;

    Some(VcsState {
        branch,
        is_clean,
        lines_added,
        lines_removed,
        ahead,
        behind,
    })
}

struct Queries<'a, R> {
    runner: &'a R,
    dir: &'a Path,
    timeout: Duration,
}

impl<R: GitRunner> Queries<'_, R> {
    /// Run one query; any failure becomes `None`.
    async fn query(&self, args: &[&str]) -> Option<String> {
        match self.runner.run(args, self.dir, self.timeout).await {
            Ok(out) => Some(out),
            Err(e) => {
                debug!(dir = %self.dir.display(), error = %e, "git query degraded");
                None
            }
        }
    }

    async fn branch(&self) -> String {
        if let Some(name) = self
            .query(&["branch", "--show-current"])
            .await
            .filter(|b| !b.is_empty())
        {
            return name;
        }
        match self
            .query(&["rev-parse", "--short", "HEAD"])
            .await
            .filter(|h| !h.is_empty())
        {
            Some(hash) => format!("HEAD@{hash}"),
            None => "unknown".to_string(),
        }
    }

    /// Commits `(ahead, behind)` relative to the upstream, `(0, 0)` without one.
    async fn ahead_behind(&self) -> (u32, u32) {
        let Some(upstream) = self
            .query(&["rev-parse", "--abbrev-ref", "@{upstream}"])
            .await
            .filter(|u| !u.is_empty())
        else {
            return (0, 0);
        };
        let range = format!("{upstream}...HEAD");
        self.query(&["rev-list", "--left-right", "--count", &range])
            .await
            .and_then(|out| parse_left_right(&out))
            .unwrap_or((0, 0))
    }
}

/// Sum `git diff --numstat` output into `(added, removed)`.
///
/// Rows whose counts aren't both integers (binary files report `-`) are
/// skipped.
pub fn sum_numstat(output: &str) -> (u64, u64) {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let added = fields.next()?.trim().parse::<u64>().ok()?;
            let removed = fields.next()?.trim().parse::<u64>().ok()?;
            Some((added, removed))
        })
        .fold((0, 0), |(a, r), (da, dr)| {
            (a.saturating_add(da), r.saturating_add(dr))
        })
}

/// Parse `git rev-list --left-right --count <upstream>...HEAD`.
///
/// Git prints `<behind>\t<ahead>`; the result is reordered to `(ahead, behind)`.
pub fn parse_left_right(output: &str) -> Option<(u32, u32)> {
    let mut fields = output.trim().split('\t');
    let (Some(behind), Some(ahead), None) = (fields.next(), fields.next(), fields.next()) else {
        return None;
    };
    Some((ahead.trim().parse().ok()?, behind.trim().parse().ok()?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    /// Canned git: each argument list maps to an output, anything else fails.
    #[derive(Default)]
    struct FakeGit {
        responses: HashMap<String, String>,
    }

    impl FakeGit {
        fn respond(mut self, args: &str, out: &str) -> Self {
            self.responses.insert(args.to_string(), out.to_string());
            self
        }

        fn repo() -> Self {
            Self::default().respond("rev-parse --git-dir", ".git")
        }
    }

    impl GitRunner for FakeGit {
        async fn run(&self, args: &[&str], _dir: &Path, _timeout: Duration) -> Result<String, QueryError> {
            let key = args.join(" ");
            self.responses
                .get(&key)
                .cloned()
                .ok_or(QueryError::Failed {
                    args: key,
                    code: Some(128),
                })
        }
    }

    async fn probe_fake(git: &FakeGit) -> Option<VcsState> {
        probe(git, Path::new("/work"), DEFAULT_TIMEOUT).await
    }

    #[tokio::test]
    async fn not_a_repo_is_absent() {
        assert_eq!(probe_fake(&FakeGit::default()).await, None);
    }

    #[tokio::test]
    async fn every_query_failing_yields_defaults() {
        let state = probe_fake(&FakeGit::repo()).await.unwrap();
        assert_eq!(
            state,
            VcsState {
                branch: "unknown".into(),
                is_clean: true,
                lines_added: 0,
                lines_removed: 0,
                ahead: 0,
                behind: 0,
            }
        );
    }

    #[tokio::test]
    async fn failed_status_query_reads_clean() {
        let git = FakeGit::repo().respond("branch --show-current", "main");
        let state = probe_fake(&git).await.unwrap();
        assert!(state.is_clean);
    }

    #[tokio::test]
    async fn status_output_means_dirty() {
        let git = FakeGit::repo()
            .respond("branch --show-current", "main")
            .respond("status --porcelain", " M src/lib.rs");
        assert!(!probe_fake(&git).await.unwrap().is_clean);
    }

    #[tokio::test]
    async fn detached_head_uses_short_hash() {
        let git = FakeGit::repo()
            .respond("branch --show-current", "")
            .respond("rev-parse --short HEAD", "abc1234");
        assert_eq!(probe_fake(&git).await.unwrap().branch, "HEAD@abc1234");
    }

    #[tokio::test]
    async fn upstream_counts_are_reordered() {
        let git = FakeGit::repo()
            .respond("branch --show-current", "feature")
            .respond("rev-parse --abbrev-ref @{upstream}", "origin/feature")
            .respond("rev-list --left-right --count origin/feature...HEAD", "2\t5");
        let state = probe_fake(&git).await.unwrap();
        assert_eq!((state.ahead, state.behind), (5, 2));
    }

    #[tokio::test]
    async fn failed_count_query_is_zero() {
        let git = FakeGit::repo().respond("rev-parse --abbrev-ref @{upstream}", "origin/main");
        let state = probe_fake(&git).await.unwrap();
        assert_eq!((state.ahead, state.behind), (0, 0));
    }

    #[tokio::test]
    async fn diff_stats_are_summed() {
        let git = FakeGit::repo().respond("diff --numstat", "3\t2\tfile1\n-\t-\tbinary\n10\t0\tfile2");
        let state = probe_fake(&git).await.unwrap();
        assert_eq!((state.lines_added, state.lines_removed), (13, 2));
    }

    #[test]
    fn numstat_skips_malformed_rows() {
        assert_eq!(sum_numstat("3\t2\tfile1\n-\t-\tbinary"), (3, 2));
        assert_eq!(sum_numstat(""), (0, 0));
        assert_eq!(sum_numstat("garbage\n4\tx\tfile\n\n1\t1\tok"), (1, 1));
    }

    #[test]
    fn left_right_parsing() {
        assert_eq!(parse_left_right("0\t0"), Some((0, 0)));
        assert_eq!(parse_left_right("3\t1\n"), Some((1, 3)));
        assert_eq!(parse_left_right("3"), None);
        assert_eq!(parse_left_right("1\t2\t3"), None);
        assert_eq!(parse_left_right("a\tb"), None);
    }

    // ── Against real repositories ───────────────────────────────────────

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .output()
            .unwrap()
            .status;
        assert!(status.success(), "git {args:?} failed");
    }

    /// Initialize a repo on `main` with one commit.
    fn init_repo(dir: &Path) {
        git(dir, &["init", "--quiet"]);
        git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(dir, &["config", "user.email", "test@test.com"]);
        git(dir, &["config", "user.name", "Test"]);
        git(dir, &["config", "commit.gpgsign", "false"]);
        fs::write(dir.join("README.md"), "# test repo\n").unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "--quiet", "-m", "initial commit"]);
    }

    async fn probe_live(dir: &Path) -> Option<VcsState> {
        probe(&LiveGit::new(), dir, DEFAULT_TIMEOUT).await
    }

    #[tokio::test]
    async fn plain_directory_has_no_vcs() {
        let dir = TempDir::new().unwrap();
        assert_eq!(probe_live(dir.path()).await, None);
    }

    #[tokio::test]
    async fn fresh_repo_is_clean() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());

        let state = probe_live(dir.path()).await.unwrap();
        assert_eq!(state.branch, "main");
        assert!(state.is_clean);
        assert_eq!((state.lines_added, state.lines_removed), (0, 0));
        assert_eq!((state.ahead, state.behind), (0, 0));
    }

    #[tokio::test]
    async fn modified_file_is_dirty_with_counts() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join("README.md"), "new first line\nsecond\n").unwrap();

        let state = probe_live(dir.path()).await.unwrap();
        assert!(!state.is_clean);
        assert_eq!((state.lines_added, state.lines_removed), (2, 1));
    }

    #[tokio::test]
    async fn untracked_file_is_dirty_without_counts() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join("notes.txt"), "scratch\n").unwrap();

        let state = probe_live(dir.path()).await.unwrap();
        assert!(!state.is_clean);
        assert_eq!((state.lines_added, state.lines_removed), (0, 0));
    }

    #[tokio::test]
    async fn detached_head_in_real_repo() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        git(dir.path(), &["checkout", "--quiet", "--detach"]);

        let state = probe_live(dir.path()).await.unwrap();
        assert!(state.branch.starts_with("HEAD@"), "got {}", state.branch);
    }

    #[tokio::test]
    async fn ahead_and_behind_upstream() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        git(dir.path(), &["branch", "upstream-main"]);
        git(dir.path(), &["branch", "--quiet", "--set-upstream-to=upstream-main"]);

        // One commit only on the upstream, two only on main.
        git(dir.path(), &["checkout", "--quiet", "upstream-main"]);
        fs::write(dir.path().join("up.txt"), "up\n").unwrap();
        git(dir.path(), &["add", "up.txt"]);
        git(dir.path(), &["commit", "--quiet", "-m", "upstream work"]);
        git(dir.path(), &["checkout", "--quiet", "main"]);
        for name in ["a.txt", "b.txt"] {
            fs::write(dir.path().join(name), "local\n").unwrap();
            git(dir.path(), &["add", name]);
            git(dir.path(), &["commit", "--quiet", "-m", name]);
        }

        let state = probe_live(dir.path()).await.unwrap();
        assert_eq!((state.ahead, state.behind), (2, 1));
    }
}
