use crate::cli::util;
use crate::config;
use crate::error::notesmith_error::JsonSnafu;
use crate::error::Result;
use crate::git::CliOps;
use crate::sync::{self, SyncRequest, SyncResult};
use snafu::ResultExt;

/// Run `notesmith sync`. Prints one JSON result object to stdout and exits
/// non-zero when the result is not ok.
pub fn run(input: Option<&str>) -> Result<()> {
    let result = match execute(input) {
        Ok(result) => result,
        Err(e) => SyncResult::from_error(&e),
    };
    let json = serde_json::to_string(&result).context(JsonSnafu)?;
    println!("{json}");
    if !result.ok {
        std::process::exit(1);
    }
    Ok(())
}

fn execute(input: Option<&str>) -> Result<SyncResult> {
    let raw = util::read_input(input)?;
    let mut request: SyncRequest = util::parse_input(&raw)?;

    let repo = config::resolve_notes_repo(request.repo_path.as_deref())?;

    // Request fields beat user-config defaults for remote and branch.
    let (default_remote, default_branch) = config::sync_defaults()?;
    if request.remote.is_none() {
        request.remote = default_remote;
    }
    if request.branch.is_none() {
        request.branch = default_branch;
    }

    let git = CliOps::new(repo.clone()).with_author(
        request.author_name.as_deref(),
        request.author_email.as_deref(),
    );
    Ok(sync::sync(&git, &repo, &request))
}
