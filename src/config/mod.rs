pub mod user_config;

use std::path::PathBuf;

use crate::error::notesmith_error::ConfigSnafu;
use crate::error::Result;
use user_config::UserConfig;

/// Environment variable naming the notes repository, checked after the
/// explicit input field and before the user config file.
pub const NOTES_REPO_ENV: &str = "NOTESMITH_NOTES_REPO";

/// Resolve the notes repository path for the current invocation.
///
/// Precedence: explicit input field > `NOTESMITH_NOTES_REPO` > user config.
/// There is deliberately no baked-in default path; an empty resolution is a
/// config error naming all three sources.
pub fn resolve_notes_repo(explicit: Option<&str>) -> Result<PathBuf> {
    let env = std::env::var(NOTES_REPO_ENV).ok();
    let user = UserConfig::load()?;
    resolve_notes_repo_from(explicit, env.as_deref(), user.as_ref())
}

pub(crate) fn resolve_notes_repo_from(
    explicit: Option<&str>,
    env: Option<&str>,
    user: Option<&UserConfig>,
) -> Result<PathBuf> {
    let candidate = explicit
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .or_else(|| {
            env.filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        })
        .or_else(|| user.and_then(|u| u.notes_repo_path.clone()));

    match candidate {
        Some(path) => Ok(PathBuf::from(path)),
        None => ConfigSnafu {
            message: format!(
                "no notes repository configured; pass a repo path in the input, \
                 set {NOTES_REPO_ENV}, or add notes_repo_path to ~/{}",
                user_config::USER_CONFIG_FILE
            ),
        }
        .fail(),
    }
}

/// Default remote/branch for the sync tool, taken from the user config when
/// the request leaves them unset.
pub fn sync_defaults() -> Result<(Option<String>, Option<String>)> {
    let user = UserConfig::load()?;
    Ok(match user {
        Some(u) => (u.remote, u.branch),
        None => (None, None),
    })
}
