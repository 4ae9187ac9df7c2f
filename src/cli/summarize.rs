use schemars::JsonSchema;
use serde::Serialize;

use crate::cli::util;
use crate::config;
use crate::error::notesmith_error::JsonSnafu;
use crate::error::Result;
use crate::note::{self, NoteInput};
use snafu::ResultExt;

/// Result document for the summarize command.
#[derive(Debug, Serialize, JsonSchema)]
pub struct SummarizeOutput {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummarizeOutput {
    fn failure(error: String) -> Self {
        Self {
            ok: false,
            path: None,
            title: None,
            tags: None,
            summary: None,
            error: Some(error),
        }
    }
}

/// Run `notesmith summarize`. Prints one JSON result object to stdout and
/// exits non-zero when the result is not ok.
pub fn run(input: Option<&str>) -> Result<()> {
    let output = match execute(input) {
        Ok(output) => output,
        Err(e) => SummarizeOutput::failure(e.to_string()),
    };
    let json = serde_json::to_string(&output).context(JsonSnafu)?;
    println!("{json}");
    if !output.ok {
        std::process::exit(1);
    }
    Ok(())
}

fn execute(input: Option<&str>) -> Result<SummarizeOutput> {
    let raw = util::read_input(input)?;
    let note_input: NoteInput = util::parse_input(&raw)?;

    let repo = config::resolve_notes_repo(note_input.notes_repo_path.as_deref())?;
    let record = note::build_note(&note_input, &repo)?;
    let path = note::write_note(&record)?;

    Ok(SummarizeOutput {
        ok: true,
        path: Some(path.display().to_string()),
        title: Some(record.title),
        tags: Some(record.tags),
        summary: Some(record.summary),
        error: None,
    })
}
