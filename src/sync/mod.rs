use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::git_error::{CommandFailedSnafu, ConflictSnafu};
use crate::error::notesmith_error::{ConfigSnafu, GitSnafu};
use crate::error::{NotesmithError, Result};
use crate::git::{Exec, GitOps};

/// Subpath staged by default.
pub const DEFAULT_STAGE_PATH: &str = "notes/";

/// Remote used when neither the request nor the user config names one.
pub const DEFAULT_REMOTE: &str = "origin";

/// Cap on captured raw git output, in bytes.
pub const MAX_CAPTURE: usize = 8000;

const TRUNCATION_MARKER: &str = "...truncated";

/// Input document for the sync command.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SyncRequest {
    /// Notes repository to sync; falls back to env and user config.
    pub repo_path: Option<String>,
    /// Subpath to stage; defaults to `notes/`.
    pub stage_path: Option<String>,
    /// Commit message; generated from the staged file count when omitted.
    pub commit_message: Option<String>,
    pub remote: Option<String>,
    /// Branch to pull/push; defaults to the current branch.
    pub branch: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    #[serde(default)]
    pub allow_empty_commit: bool,
}

/// Result document for the sync command. Constructed fresh per invocation.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SyncResult {
    pub ok: bool,
    /// Human-readable action log, chronological, returned even on failure.
    pub actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
    /// Captured raw git stdout, truncated to [`MAX_CAPTURE`] bytes.
    pub stdout: String,
    /// Captured raw git stderr, truncated to [`MAX_CAPTURE`] bytes.
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncResult {
    /// Failure result for errors raised before the state machine starts.
    pub fn from_error(error: &NotesmithError) -> Self {
        Self {
            ok: false,
            actions: Vec::new(),
            commit_hash: None,
            stdout: String::new(),
            stderr: String::new(),
            error: Some(error.to_string()),
        }
    }
}

/// States of the sync orchestration, in execution order. Each state has one
/// transition function; an error is terminal from any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Validate,
    Pull,
    Stage,
    Commit,
    Push,
    Done,
}

/// Run the full sync: Validate -> Pull -> Stage -> Commit -> Push -> Done.
/// All failures are folded into the returned [`SyncResult`]; partial
/// progress (a commit hash whose push failed) stays visible so the caller
/// can resume from the right step.
pub fn sync(git: &dyn GitOps, repo_path: &Path, request: &SyncRequest) -> SyncResult {
    let mut run = SyncRun::new(git, repo_path, request);
    let mut state = SyncState::Validate;
    loop {
        let next = match state {
            SyncState::Validate => run.step_validate(),
            SyncState::Pull => run.step_pull(),
            SyncState::Stage => run.step_stage(),
            SyncState::Commit => run.step_commit(),
            SyncState::Push => run.step_push(),
            SyncState::Done => return run.finish(None),
        };
        match next {
            Ok(next_state) => state = next_state,
            Err(e) => return run.finish(Some(e)),
        }
    }
}

struct SyncRun<'a> {
    git: &'a dyn GitOps,
    repo_path: &'a Path,
    request: &'a SyncRequest,
    remote: String,
    branch: Option<String>,
    stage_path: String,
    actions: Vec<String>,
    stdout: String,
    stderr: String,
    commit_hash: Option<String>,
    staged_count: usize,
}

impl<'a> SyncRun<'a> {
    fn new(git: &'a dyn GitOps, repo_path: &'a Path, request: &'a SyncRequest) -> Self {
        Self {
            git,
            repo_path,
            request,
            remote: request
                .remote
                .clone()
                .unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            branch: request.branch.clone(),
            stage_path: request
                .stage_path
                .clone()
                .unwrap_or_else(|| DEFAULT_STAGE_PATH.to_string()),
            actions: Vec::new(),
            stdout: String::new(),
            stderr: String::new(),
            commit_hash: None,
            staged_count: 0,
        }
    }

    fn capture(&mut self, exec: &Exec) {
        append_capped(&mut self.stdout, &exec.stdout);
        append_capped(&mut self.stderr, &exec.stderr);
    }

    fn finish(self, error: Option<NotesmithError>) -> SyncResult {
        SyncResult {
            ok: error.is_none(),
            actions: self.actions,
            commit_hash: self.commit_hash,
            stdout: self.stdout,
            stderr: self.stderr,
            error: error.map(|e| e.to_string()),
        }
    }

    fn step_validate(&mut self) -> Result<SyncState> {
        if !self.repo_path.is_dir() {
            return ConfigSnafu {
                message: format!(
                    "repo path does not exist or is not a directory: {}",
                    self.repo_path.display()
                ),
            }
            .fail();
        }
        if !self.repo_path.join(".git").is_dir() {
            return ConfigSnafu {
                message: format!(
                    "not a git repository (missing .git): {}",
                    self.repo_path.display()
                ),
            }
            .fail();
        }
        self.actions
            .push(format!("validated repository at {}", self.repo_path.display()));
        Ok(SyncState::Pull)
    }

    fn step_pull(&mut self) -> Result<SyncState> {
        if self.branch.is_none() {
            let exec = self.git.current_branch().context(GitSnafu)?;
            self.capture(&exec);
            if exec.success {
                let branch = exec.stdout.trim();
                if !branch.is_empty() && branch != "HEAD" {
                    self.branch = Some(branch.to_string());
                }
            }
        }

        let exec = self
            .git
            .pull_rebase(&self.remote, self.branch.as_deref())
            .context(GitSnafu)?;
        self.capture(&exec);
        if !exec.success {
            if detect_conflict(&exec.combined()) {
                self.actions
                    .push(format!("pull --rebase from {} hit conflicts", self.remote));
                tracing::warn!("rebase pull left conflicts in {}", self.repo_path.display());
                return ConflictSnafu {
                    message: "pull --rebase stopped on conflicts; resolve them manually and rerun",
                }
                .fail()
                .context(GitSnafu);
            }
            self.actions.push(format!("pull from {} failed", self.remote));
            return CommandFailedSnafu {
                message: format!("pull --rebase failed: {}", exec.stderr.trim()),
            }
            .fail()
            .context(GitSnafu);
        }
        self.actions.push(format!("pulled {} with rebase", self.remote));

        let status = self.git.status_porcelain().context(GitSnafu)?;
        self.capture(&status);
        if !status.success {
            return CommandFailedSnafu {
                message: "git status failed after pull",
            }
            .fail()
            .context(GitSnafu);
        }
        if has_unmerged(&status.stdout) {
            return ConflictSnafu {
                message: "unmerged paths present after pull; resolve them manually and rerun",
            }
            .fail()
            .context(GitSnafu);
        }
        Ok(SyncState::Stage)
    }

    fn step_stage(&mut self) -> Result<SyncState> {
        let exec = self.git.add(&self.stage_path).context(GitSnafu)?;
        self.capture(&exec);
        if !exec.success {
            return CommandFailedSnafu {
                message: format!("git add failed: {}", exec.stderr.trim()),
            }
            .fail()
            .context(GitSnafu);
        }
        self.actions.push(format!("staged {}", self.stage_path));

        let staged = self.git.staged_files().context(GitSnafu)?;
        self.capture(&staged);
        if !staged.success {
            return CommandFailedSnafu {
                message: "git diff --cached failed",
            }
            .fail()
            .context(GitSnafu);
        }
        self.staged_count = staged.stdout.lines().filter(|l| !l.trim().is_empty()).count();

        if self.staged_count == 0 && !self.request.allow_empty_commit {
            self.actions.push("nothing to commit".to_string());
            return Ok(SyncState::Done);
        }
        Ok(SyncState::Commit)
    }

    fn step_commit(&mut self) -> Result<SyncState> {
        let message = self
            .request
            .commit_message
            .clone()
            .unwrap_or_else(|| default_commit_message(self.staged_count));
        let allow_empty = self.request.allow_empty_commit && self.staged_count == 0;

        let exec = self.git.commit(&message, allow_empty).context(GitSnafu)?;
        self.capture(&exec);
        if !exec.success {
            self.actions.push("commit failed".to_string());
            return CommandFailedSnafu {
                message: format!("git commit failed: {}", exec.stderr.trim()),
            }
            .fail()
            .context(GitSnafu);
        }

        let head = self.git.head_sha().context(GitSnafu)?;
        self.capture(&head);
        if head.success {
            let sha = head.stdout.trim().to_string();
            if !sha.is_empty() {
                self.commit_hash = Some(sha);
            }
        }
        let short = self
            .commit_hash
            .as_deref()
            .map(|h| h.get(..7).unwrap_or(h))
            .unwrap_or("HEAD");
        self.actions
            .push(format!("committed {short} ({} staged)", self.staged_count));
        Ok(SyncState::Push)
    }

    fn step_push(&mut self) -> Result<SyncState> {
        let exec = self
            .git
            .push(&self.remote, self.branch.as_deref())
            .context(GitSnafu)?;
        self.capture(&exec);
        if !exec.success {
            self.actions.push(format!("push to {} failed", self.remote));
            return CommandFailedSnafu {
                message: format!("git push failed: {}", exec.stderr.trim()),
            }
            .fail()
            .context(GitSnafu);
        }
        self.actions.push(format!("pushed to {}", self.remote));
        Ok(SyncState::Done)
    }
}

/// Rebase/merge conflict markers git prints on a stopped pull.
fn detect_conflict(output: &str) -> bool {
    let lowered = output.to_lowercase();
    [
        "conflict",
        "fix conflicts",
        "resolve all conflicts",
        "after resolving the conflicts",
        "could not apply",
    ]
    .iter()
    .any(|marker| lowered.contains(marker))
}

/// True when `git status --porcelain` output lists unmerged entries.
fn has_unmerged(porcelain: &str) -> bool {
    porcelain.lines().any(|line| {
        let status: String = line.chars().take(2).collect();
        status.len() == 2 && (status.contains('U') || status == "DD" || status == "AA")
    })
}

fn default_commit_message(staged: usize) -> String {
    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M");
    match staged {
        0 => format!("notes: sync {stamp}"),
        1 => format!("notes: sync 1 file {stamp}"),
        n => format!("notes: sync {n} files {stamp}"),
    }
}

fn append_capped(buf: &mut String, chunk: &str) {
    if buf.len() >= MAX_CAPTURE || chunk.is_empty() {
        return;
    }
    buf.push_str(chunk);
    if buf.len() > MAX_CAPTURE {
        let mut cut = MAX_CAPTURE - TRUNCATION_MARKER.len();
        while !buf.is_char_boundary(cut) {
            cut -= 1;
        }
        buf.truncate(cut);
        buf.push_str(TRUNCATION_MARKER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitError;

    fn ok(stdout: &str) -> Exec {
        Exec {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn fail(stderr: &str) -> Exec {
        Exec {
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    /// Scripted GitOps double. Steps that must never run are set to a
    /// failing Exec so an unexpected transition surfaces in the result.
    struct FakeGit {
        branch: Exec,
        pull: Exec,
        status: Exec,
        add: Exec,
        staged: Exec,
        commit: Exec,
        head: Exec,
        push: Exec,
    }

    impl Default for FakeGit {
        fn default() -> Self {
            Self {
                branch: ok("main\n"),
                pull: ok("Already up to date.\n"),
                status: ok(""),
                add: ok(""),
                staged: ok("notes/2026/2026-02/2026-02-24-demo-1a2b3c4d.md\n"),
                commit: ok("[main 1234abc] notes: sync\n"),
                head: ok("1234abcdef1234abcdef1234abcdef1234abcdef\n"),
                push: ok(""),
            }
        }
    }

    impl GitOps for FakeGit {
        fn status_porcelain(&self) -> Result<Exec, GitError> {
            Ok(self.status.clone())
        }
        fn current_branch(&self) -> Result<Exec, GitError> {
            Ok(self.branch.clone())
        }
        fn pull_rebase(&self, _remote: &str, _branch: Option<&str>) -> Result<Exec, GitError> {
            Ok(self.pull.clone())
        }
        fn add(&self, _path: &str) -> Result<Exec, GitError> {
            Ok(self.add.clone())
        }
        fn staged_files(&self) -> Result<Exec, GitError> {
            Ok(self.staged.clone())
        }
        fn commit(&self, _message: &str, _allow_empty: bool) -> Result<Exec, GitError> {
            Ok(self.commit.clone())
        }
        fn head_sha(&self) -> Result<Exec, GitError> {
            Ok(self.head.clone())
        }
        fn push(&self, _remote: &str, _branch: Option<&str>) -> Result<Exec, GitError> {
            Ok(self.push.clone())
        }
    }

    fn fake_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        dir
    }

    #[test]
    fn full_run_reports_every_step() {
        let repo = fake_repo();
        let git = FakeGit::default();
        let result = sync(&git, repo.path(), &SyncRequest::default());

        assert!(result.ok, "unexpected error: {:?}", result.error);
        assert_eq!(
            result.commit_hash.as_deref(),
            Some("1234abcdef1234abcdef1234abcdef1234abcdef")
        );
        let log = result.actions.join("\n");
        assert!(log.contains("validated repository"));
        assert!(log.contains("pulled origin with rebase"));
        assert!(log.contains("staged notes/"));
        assert!(log.contains("committed 1234abc"));
        assert!(log.contains("pushed to origin"));
    }

    #[test]
    fn nothing_to_commit_short_circuits() {
        let repo = fake_repo();
        let git = FakeGit {
            staged: ok(""),
            // must never be reached
            commit: fail("commit should not run"),
            push: fail("push should not run"),
            ..FakeGit::default()
        };
        let result = sync(&git, repo.path(), &SyncRequest::default());

        assert!(result.ok, "unexpected error: {:?}", result.error);
        assert!(result.commit_hash.is_none());
        assert!(result.actions.iter().any(|a| a == "nothing to commit"));
    }

    #[test]
    fn push_failure_keeps_commit_hash() {
        let repo = fake_repo();
        let git = FakeGit {
            push: fail("! [rejected] main -> main (non-fast-forward)"),
            ..FakeGit::default()
        };
        let result = sync(&git, repo.path(), &SyncRequest::default());

        assert!(!result.ok);
        assert!(result.commit_hash.is_some());
        assert!(result.error.as_deref().unwrap().contains("push"));
        let log = result.actions.join("\n");
        assert!(log.contains("pulled origin with rebase"));
        assert!(log.contains("staged notes/"));
        assert!(log.contains("committed"));
        assert!(log.contains("push to origin failed"));
    }

    #[test]
    fn pull_conflict_is_terminal() {
        let repo = fake_repo();
        let git = FakeGit {
            pull: fail("CONFLICT (content): Merge conflict in notes/a.md\nfix conflicts and then run rebase --continue"),
            ..FakeGit::default()
        };
        let result = sync(&git, repo.path(), &SyncRequest::default());

        assert!(!result.ok);
        assert!(result.commit_hash.is_none());
        assert!(result.error.as_deref().unwrap().contains("conflict"));
        assert!(result
            .actions
            .iter()
            .any(|a| a.contains("hit conflicts")));
    }

    #[test]
    fn unmerged_paths_after_pull_are_a_conflict() {
        let repo = fake_repo();
        let git = FakeGit {
            status: ok("UU notes/a.md\n"),
            ..FakeGit::default()
        };
        let result = sync(&git, repo.path(), &SyncRequest::default());

        assert!(!result.ok);
        assert!(result.error.as_deref().unwrap().contains("unmerged"));
    }

    #[test]
    fn missing_git_dir_fails_before_any_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let git = FakeGit {
            pull: fail("pull should not run"),
            ..FakeGit::default()
        };
        let result = sync(&git, dir.path(), &SyncRequest::default());

        assert!(!result.ok);
        assert!(result.actions.is_empty());
        assert!(result.error.as_deref().unwrap().contains("not a git repository"));
    }

    #[test]
    fn detached_head_falls_back_to_bare_push() {
        let repo = fake_repo();
        let git = FakeGit {
            branch: ok("HEAD\n"),
            ..FakeGit::default()
        };
        let result = sync(&git, repo.path(), &SyncRequest::default());
        assert!(result.ok, "unexpected error: {:?}", result.error);
    }

    #[test]
    fn captured_output_is_truncated() {
        let repo = fake_repo();
        let git = FakeGit {
            pull: ok(&"x".repeat(MAX_CAPTURE * 3)),
            ..FakeGit::default()
        };
        let result = sync(&git, repo.path(), &SyncRequest::default());

        assert!(result.stdout.len() <= MAX_CAPTURE);
        assert!(result.stdout.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn explicit_branch_skips_discovery() {
        let repo = fake_repo();
        let git = FakeGit {
            branch: fail("branch discovery should not run"),
            ..FakeGit::default()
        };
        let request = SyncRequest {
            branch: Some("main".to_string()),
            ..SyncRequest::default()
        };
        let result = sync(&git, repo.path(), &request);
        assert!(result.ok, "unexpected error: {:?}", result.error);
    }

    #[test]
    fn unmerged_status_detection() {
        assert!(has_unmerged("UU notes/a.md\n"));
        assert!(has_unmerged("AA both-added.md\n"));
        assert!(has_unmerged("DD both-deleted.md\n"));
        assert!(!has_unmerged(" M notes/a.md\n?? new-file\n"));
        assert!(!has_unmerged(""));
    }

    #[test]
    fn conflict_marker_detection() {
        assert!(detect_conflict("CONFLICT (content): Merge conflict in a.md"));
        assert!(detect_conflict("error: could not apply 1234abc"));
        assert!(!detect_conflict("Already up to date."));
    }
}
