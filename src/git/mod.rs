//! Git backend for stagecraft: status, staging, diffs, commits and HEAD edits.
//!
//! Every invocation shells out to `git` in the repo root and is bounded by a
//! timeout. Failures come back as `GitError` values; the dispatcher folds them
//! into result messages, so a broken or hung git never takes the TUI down.
mod commit;
mod status;

pub use commit::{HeadInfo, validate_commit_date};
pub use status::{FileCategory, RepoSnapshot};

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

// ── Errors ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("git {command} timed out after {}s", .after.as_secs())]
    Timeout { command: String, after: Duration },
    #[error("git {command}: {output}")]
    Failed { command: String, output: String },
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ── Backend contract ───────────────────────────────────────────────────────────

/// Everything the application core needs from version control.
///
/// Each method is one independent unit of work. Implementations must not
/// touch application state; they only return values.
pub trait Backend: Send + Sync + 'static {
    fn status(&self) -> impl Future<Output = Result<RepoSnapshot, GitError>> + Send;
    fn stage(&self, paths: &[String]) -> impl Future<Output = Result<(), GitError>> + Send;
    fn unstage(&self, paths: &[String]) -> impl Future<Output = Result<(), GitError>> + Send;
    fn diff(&self, path: &str, staged: bool)
    -> impl Future<Output = Result<String, GitError>> + Send;
    /// Raw bytes of a working-tree file, relative to the repo root.
    fn read_file(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, GitError>> + Send;
    /// `date` is already validated; empty means "now".
    fn commit(&self, message: &str, date: &str)
    -> impl Future<Output = Result<(), GitError>> + Send;
    fn amend_message(&self, message: &str) -> impl Future<Output = Result<(), GitError>> + Send;
    fn soft_reset_head(&self) -> impl Future<Output = Result<(), GitError>> + Send;
    fn head_info(&self) -> impl Future<Output = Result<HeadInfo, GitError>> + Send;
}

// ── Repository handle ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GitRepo {
    /// Absolute path to the working tree root.
    pub root: PathBuf,
    timeout: Duration,
}

impl GitRepo {
    /// Open the repository containing `path`.
    /// Returns `None` if `path` is not inside a working tree, or if git is not installed.
    pub fn open(path: &Path, timeout: Duration) -> Option<Self> {
        let output = std::process::Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(path)
            .stderr(Stdio::null())
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let root = String::from_utf8(output.stdout).ok()?;
        let root = root.trim();
        if root.is_empty() {
            return None;
        }
        Some(Self {
            root: PathBuf::from(root),
            timeout,
        })
    }

    /// Run a git command in the repo root. Returns stdout on success.
    async fn run_git(&self, args: &[&str]) -> Result<String, GitError> {
        let command = args.first().copied().unwrap_or_default().to_string();
        let fut = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match timeout(self.timeout, fut).await {
            Ok(Ok(o)) => o,
            Ok(Err(e)) => return Err(GitError::Spawn(e)),
            Err(_) => {
                tracing::warn!(%command, "git invocation timed out");
                return Err(GitError::Timeout {
                    command,
                    after: self.timeout,
                });
            }
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let text = if stderr.trim().is_empty() { stdout } else { stderr };
            Err(GitError::Failed {
                command,
                output: text.trim().to_string(),
            })
        }
    }

    async fn current_branch(&self) -> String {
        self.run_git(&["branch", "--show-current"])
            .await
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    /// True when HEAD is already contained in the branch's remote tracking branch.
    async fn head_is_pushed(&self) -> bool {
        let upstream = match self
            .run_git(&["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"])
            .await
        {
            Ok(u) if !u.trim().is_empty() => u.trim().to_string(),
            _ => {
                let branch = self.current_branch().await;
                if branch.is_empty() {
                    return false;
                }
                format!("origin/{branch}")
            }
        };
        match self.run_git(&["branch", "-r", "--contains", "HEAD"]).await {
            Ok(out) => out.lines().any(|l| l.trim() == upstream),
            Err(_) => false,
        }
    }
}

fn with_paths<'a>(base: &[&'a str], paths: &'a [String]) -> Vec<&'a str> {
    let mut args = base.to_vec();
    args.extend(paths.iter().map(String::as_str));
    args
}

impl Backend for GitRepo {
    async fn status(&self) -> Result<RepoSnapshot, GitError> {
        let out = self
            .run_git(&["status", "--porcelain=v1", "-z", "-u"])
            .await?;
        let branch = self.current_branch().await;
        Ok(RepoSnapshot::parse(&out, branch))
    }

    async fn stage(&self, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }
        self.run_git(&with_paths(&["add", "--"], paths)).await?;
        Ok(())
    }

    async fn unstage(&self, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }
        self.run_git(&with_paths(&["reset", "-q", "HEAD", "--"], paths))
            .await?;
        Ok(())
    }

    async fn diff(&self, path: &str, staged: bool) -> Result<String, GitError> {
        let mut args = vec!["diff", "--no-color"];
        if staged {
            args.push("--cached");
        }
        args.extend(["--", path]);
        self.run_git(&args).await
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>, GitError> {
        tokio::fs::read(self.root.join(path))
            .await
            .map_err(|source| GitError::Io {
                path: path.to_string(),
                source,
            })
    }

    async fn commit(&self, message: &str, date: &str) -> Result<(), GitError> {
        let mut args = vec!["commit", "-m", message];
        if !date.is_empty() {
            args.extend(["--date", date]);
        }
        self.run_git(&args).await?;
        Ok(())
    }

    async fn amend_message(&self, message: &str) -> Result<(), GitError> {
        self.run_git(&["commit", "--amend", "-m", message]).await?;
        Ok(())
    }

    async fn soft_reset_head(&self) -> Result<(), GitError> {
        self.run_git(&["reset", "--soft", "HEAD~1"]).await?;
        Ok(())
    }

    async fn head_info(&self) -> Result<HeadInfo, GitError> {
        let out = self
            .run_git(&["log", "-1", commit::HEAD_FORMAT, "HEAD"])
            .await?;
        let mut info = HeadInfo::parse(&out).ok_or_else(|| GitError::Failed {
            command: "log".to_string(),
            output: "unexpected output for HEAD".to_string(),
        })?;
        info.pushed = self.head_is_pushed().await;
        Ok(info)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
