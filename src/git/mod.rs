pub mod cli_ops;

pub use cli_ops::CliOps;

use crate::error::GitError;

/// Outcome of a single git invocation: exit status plus captured streams.
#[derive(Debug, Clone, Default)]
pub struct Exec {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl Exec {
    /// Both streams joined, for conflict-marker scanning.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }
}

/// Abstraction over the git operations the sync orchestrator performs.
/// CliOps shells out to the `git` binary; tests substitute a scripted fake.
///
/// Methods return `Err` only when git could not be invoked at all; a
/// non-zero exit is reported through `Exec::success` so each step of the
/// orchestrator decides what that failure means.
pub trait GitOps: Send + Sync {
    /// `git status --porcelain`.
    fn status_porcelain(&self) -> Result<Exec, GitError>;

    /// `git rev-parse --abbrev-ref HEAD`.
    fn current_branch(&self) -> Result<Exec, GitError>;

    /// `git pull --rebase <remote> [branch]`.
    fn pull_rebase(&self, remote: &str, branch: Option<&str>) -> Result<Exec, GitError>;

    /// `git add <path>`.
    fn add(&self, path: &str) -> Result<Exec, GitError>;

    /// `git diff --cached --name-only`.
    fn staged_files(&self) -> Result<Exec, GitError>;

    /// `git commit -m <message>`, optionally `--allow-empty`.
    fn commit(&self, message: &str, allow_empty: bool) -> Result<Exec, GitError>;

    /// `git rev-parse HEAD`.
    fn head_sha(&self) -> Result<Exec, GitError>;

    /// `git push <remote> [branch]`.
    fn push(&self, remote: &str, branch: Option<&str>) -> Result<Exec, GitError>;
}
