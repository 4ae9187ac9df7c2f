use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::notesmith_error::{ConfigSnafu, IoSnafu};
use crate::error::Result;
use snafu::ResultExt;

/// Name of the user config file under the home directory.
pub const USER_CONFIG_FILE: &str = ".notesmith.toml";

/// User-level config stored at ~/.notesmith.toml.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_repo_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl UserConfig {
    /// Path to the user config file (~/.notesmith.toml).
    pub fn path() -> Option<PathBuf> {
        std::env::var("HOME")
            .ok()
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .map(|home| home.join(USER_CONFIG_FILE))
    }

    /// Load user config from ~/.notesmith.toml.
    /// Returns Ok(None) if the file does not exist or HOME is unset.
    pub fn load() -> Result<Option<Self>> {
        let Some(path) = Self::path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context(IoSnafu)?;
        let config: UserConfig = toml::from_str(&contents)
            .map_err(|e| {
                ConfigSnafu {
                    message: format!("malformed {}: {e}", path.display()),
                }
                .build()
            })?;
        Ok(Some(config))
    }
}
