use std::path::PathBuf;
use std::process::Command;

use crate::error::git_error::CommandFailedSnafu;
use crate::error::GitError;
use crate::git::{Exec, GitOps};

/// Git operations implemented by shelling out to the `git` CLI.
pub struct CliOps {
    pub repo_dir: PathBuf,
    env: Vec<(String, String)>,
}

impl CliOps {
    pub fn new(repo_dir: PathBuf) -> Self {
        Self {
            repo_dir,
            env: Vec::new(),
        }
    }

    /// Export author/committer identity to every spawned git process.
    pub fn with_author(mut self, name: Option<&str>, email: Option<&str>) -> Self {
        if let Some(name) = name {
            self.env.push(("GIT_AUTHOR_NAME".to_string(), name.to_string()));
            self.env.push(("GIT_COMMITTER_NAME".to_string(), name.to_string()));
        }
        if let Some(email) = email {
            self.env.push(("GIT_AUTHOR_EMAIL".to_string(), email.to_string()));
            self.env.push(("GIT_COMMITTER_EMAIL".to_string(), email.to_string()));
        }
        self
    }

    /// Run git and return exit status with both streams, without failing on
    /// non-zero exit.
    fn run_git_raw(&self, args: &[&str]) -> Result<Exec, GitError> {
        tracing::debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|e| {
                CommandFailedSnafu {
                    message: format!("failed to run git: {e}"),
                }
                .build()
            })?;

        Ok(Exec {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

impl GitOps for CliOps {
    fn status_porcelain(&self) -> Result<Exec, GitError> {
        self.run_git_raw(&["status", "--porcelain"])
    }

    fn current_branch(&self) -> Result<Exec, GitError> {
        self.run_git_raw(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn pull_rebase(&self, remote: &str, branch: Option<&str>) -> Result<Exec, GitError> {
        let mut args = vec!["pull", "--rebase", remote];
        if let Some(branch) = branch {
            args.push(branch);
        }
        self.run_git_raw(&args)
    }

    fn add(&self, path: &str) -> Result<Exec, GitError> {
        self.run_git_raw(&["add", path])
    }

    fn staged_files(&self) -> Result<Exec, GitError> {
        self.run_git_raw(&["diff", "--cached", "--name-only"])
    }

    fn commit(&self, message: &str, allow_empty: bool) -> Result<Exec, GitError> {
        if allow_empty {
            self.run_git_raw(&["commit", "--allow-empty", "-m", message])
        } else {
            self.run_git_raw(&["commit", "-m", message])
        }
    }

    fn head_sha(&self) -> Result<Exec, GitError> {
        self.run_git_raw(&["rev-parse", "HEAD"])
    }

    fn push(&self, remote: &str, branch: Option<&str>) -> Result<Exec, GitError> {
        let mut args = vec!["push", remote];
        if let Some(branch) = branch {
            args.push(branch);
        }
        self.run_git_raw(&args)
    }
}
