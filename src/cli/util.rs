use std::io::Read;

use serde::de::DeserializeOwned;

use crate::error::notesmith_error::{IoSnafu, ValidationSnafu};
use crate::error::Result;
use snafu::ResultExt;

/// Read the raw JSON input document from a file or stdin.
pub(crate) fn read_input(path: Option<&str>) -> Result<String> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path).context(IoSnafu)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context(IoSnafu)?;
            buf
        }
    };
    if raw.trim().is_empty() {
        return ValidationSnafu {
            message: "no input JSON provided",
        }
        .fail();
    }
    Ok(raw)
}

/// Parse the input document; malformed JSON is a validation error.
pub(crate) fn parse_input<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| {
        ValidationSnafu {
            message: format!("invalid JSON input: {e}"),
        }
        .build()
    })
}
