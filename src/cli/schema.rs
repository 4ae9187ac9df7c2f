use crate::error::Result;
use schemars::schema_for;

/// Run the `notesmith schema <name>` subcommand.
///
/// Prints the JSON Schema for the requested type to stdout.
/// This makes the CLI self-documenting for agent runtimes.
pub fn run(name: &str) -> Result<()> {
    let schema = match name {
        "summarize-input" => {
            schema_for!(crate::note::NoteInput)
        }
        "summarize-output" => {
            schema_for!(crate::cli::summarize::SummarizeOutput)
        }
        "sync-input" => {
            schema_for!(crate::sync::SyncRequest)
        }
        "sync-result" => {
            schema_for!(crate::sync::SyncResult)
        }
        _ => {
            return Err(crate::error::NotesmithError::Validation {
                message: format!(
                    "Unknown schema name: '{name}'. Available: summarize-input, summarize-output, sync-input, sync-result"
                ),
                location: snafu::Location::default(),
            });
        }
    };

    let json = serde_json::to_string_pretty(&schema).map_err(|e| {
        crate::error::NotesmithError::Json {
            source: e,
            location: snafu::Location::default(),
        }
    })?;
    println!("{json}");

    Ok(())
}
