pub mod evidence;
pub mod render;
pub mod slug;
pub mod tags;
pub mod title;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::notesmith_error::{ConfigSnafu, ValidationSnafu, WriteSnafu};
use crate::error::Result;
use evidence::{extract_file_refs, extract_links, select_evidence, ERROR_RE, FILE_LINE_RE, WARNING_RE};
use title::{clean_title_from_line, infer_title};

/// Source metadata attached to a note input.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoteMeta {
    pub project: Option<String>,
    pub topic: Option<String>,
    pub source: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

/// How the input text is turned into a note body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Inspect the first non-blank line: a Markdown heading means the text
    /// is a pre-formed document, anything else gets summarized.
    #[default]
    Auto,
    Summary,
    Document,
}

/// Input document for the summarize command.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NoteInput {
    /// Raw text to capture.
    pub text: String,
    #[serde(default)]
    pub meta: NoteMeta,
    /// Preferred slug, used when meta carries no project/topic.
    pub slug_hint: Option<String>,
    #[serde(default)]
    pub mode: Mode,
    /// Notes repository override; falls back to env and user config.
    pub notes_repo_path: Option<String>,
    /// Creation date override (YYYY-MM-DD); defaults to today.
    pub date: Option<String>,
    /// Cap on evidence excerpts; defaults to 8.
    pub max_excerpt_lines: Option<usize>,
}

/// Confidence in the summary, estimated from the evidence found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    fn estimate(evidence_count: usize) -> Self {
        if evidence_count >= 4 {
            Confidence::High
        } else if evidence_count <= 1 {
            Confidence::Low
        } else {
            Confidence::Medium
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// Note body, per resolved mode.
#[derive(Debug, Clone)]
pub enum NoteBody {
    /// The input text stored verbatim.
    Document(String),
    /// Condensed summary sections; evidence lives on the record.
    Summary {
        tldr: Vec<String>,
        findings: Vec<String>,
        next_steps: Vec<String>,
        links: Vec<String>,
    },
}

/// A fully derived note, ready to be rendered and written.
#[derive(Debug, Clone)]
pub struct NoteRecord {
    pub path: PathBuf,
    pub note_id: String,
    pub title: String,
    pub slug: String,
    pub date: NaiveDate,
    pub project: String,
    pub topic: String,
    pub source: String,
    pub tags: Vec<String>,
    pub evidence: Vec<String>,
    pub confidence: Confidence,
    pub body: NoteBody,
    /// One-line summary echoed in the CLI output.
    pub summary: String,
}

/// Derive a [`NoteRecord`] from the input. Pure except for reading the
/// clock when no date override is given; the write happens in
/// [`write_note`].
pub fn build_note(input: &NoteInput, repo: &Path) -> Result<NoteRecord> {
    if input.text.trim().is_empty() {
        return ValidationSnafu {
            message: "text is required and must be non-empty",
        }
        .fail();
    }

    let max_excerpt_lines = input
        .max_excerpt_lines
        .unwrap_or(evidence::DEFAULT_MAX_EXCERPT_LINES);
    if max_excerpt_lines == 0 {
        return ValidationSnafu {
            message: "max_excerpt_lines must be a positive integer",
        }
        .fail();
    }

    if !repo.is_dir() {
        return ConfigSnafu {
            message: format!(
                "notes repository path does not exist or is not a directory: {}",
                repo.display()
            ),
        }
        .fail();
    }

    let date = match &input.date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            ValidationSnafu {
                message: "date must be in YYYY-MM-DD format",
            }
            .build()
        })?,
        None => chrono::Local::now().date_naive(),
    };
    let date_str = date.format("%Y-%m-%d").to_string();

    let lines: Vec<&str> = input.text.lines().collect();
    let first_heading = lines
        .iter()
        .copied()
        .find(|l| !l.trim().is_empty())
        .and_then(heading_text);

    let mode = match input.mode {
        Mode::Auto => {
            if first_heading.is_some() {
                Mode::Document
            } else {
                Mode::Summary
            }
        }
        other => other,
    };

    let evidence_lines = select_evidence(&lines, max_excerpt_lines);
    let file_refs = extract_file_refs(&lines);

    let title = match (mode, &first_heading) {
        (Mode::Document, Some(heading)) => heading.to_string(),
        _ => infer_title(&lines, &input.meta),
    };

    let slug_basis = if input.meta.project.is_some() || input.meta.topic.is_some() {
        [input.meta.project.as_deref(), input.meta.topic.as_deref()]
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    } else if let Some(hint) = input.slug_hint.as_deref().filter(|h| !h.trim().is_empty()) {
        hint.to_string()
    } else {
        title.clone()
    };
    let slug = slug::slugify(&slug_basis);

    let shortid = short_id(&input.text, &date_str);
    let note_id = format!("{date_str}-{slug}-{shortid}");

    let tags = tags::build_tags(&input.text, &input.meta);
    let confidence = Confidence::estimate(evidence_lines.len());
    let summary = build_summary(&title, &input.meta, evidence_lines.len());

    let body = match mode {
        Mode::Document => NoteBody::Document(input.text.clone()),
        _ => NoteBody::Summary {
            tldr: build_tldr(&title, &input.meta, &file_refs, evidence_lines.len()),
            findings: build_key_findings(&evidence_lines, &input.meta, &file_refs),
            next_steps: build_next_steps(&file_refs, &input.meta),
            links: build_links(&input.text, &input.meta),
        },
    };

    let filename = format!("{note_id}.md");
    let path = repo
        .join("notes")
        .join(date.format("%Y").to_string())
        .join(date.format("%Y-%m").to_string())
        .join(filename);

    Ok(NoteRecord {
        path,
        note_id,
        title,
        slug,
        date,
        project: input.meta.project.clone().unwrap_or_else(|| "general".to_string()),
        topic: input.meta.topic.clone().unwrap_or_else(|| "general".to_string()),
        source: input.meta.source.clone().unwrap_or_else(|| "chat".to_string()),
        tags,
        evidence: evidence_lines,
        confidence,
        body,
        summary,
    })
}

/// Write the rendered note, creating date-bucket directories as needed.
///
/// A pre-existing file with identical content is the idempotent re-run case
/// and succeeds without touching the file; different content under the same
/// disambiguator is fatal, never overwritten.
pub fn write_note(record: &NoteRecord) -> Result<PathBuf> {
    let rendered = render::render(record);
    let path_str = record.path.display().to_string();

    if let Some(parent) = record.path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            WriteSnafu {
                path: parent.display().to_string(),
                message: format!("failed to create note directory: {e}"),
            }
            .build()
        })?;
    }

    if record.path.exists() {
        let existing = std::fs::read_to_string(&record.path).map_err(|e| {
            WriteSnafu {
                path: path_str.clone(),
                message: format!("failed to read existing note: {e}"),
            }
            .build()
        })?;
        if existing == rendered {
            tracing::debug!("identical note already present at {path_str}");
            return Ok(record.path.clone());
        }
        return WriteSnafu {
            path: path_str,
            message: "already exists with different content; refusing to overwrite",
        }
        .fail();
    }

    std::fs::write(&record.path, rendered).map_err(|e| {
        WriteSnafu {
            path: path_str.clone(),
            message: format!("failed to write note: {e}"),
        }
        .build()
    })?;
    tracing::info!("wrote note to {path_str}");
    Ok(record.path.clone())
}

/// Heading text of a Markdown `#`-heading line, if it is one.
fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let rest = trimmed.trim_start_matches('#');
    let hashes = trimmed.len() - rest.len();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let text = rest.strip_prefix(|c: char| c.is_whitespace())?.trim();
    (!text.is_empty()).then_some(text)
}

/// Short disambiguator: first 8 hex chars of SHA-256 over text and date.
/// Deterministic, so re-running identical input lands on the same path.
fn short_id(text: &str, date_str: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update(b"\n");
    hasher.update(date_str.as_bytes());
    hasher
        .finalize()
        .iter()
        .take(4)
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn context_line(meta: &NoteMeta) -> Option<String> {
    let parts: Vec<&str> = [meta.project.as_deref(), meta.topic.as_deref()]
        .iter()
        .flatten()
        .copied()
        .collect();
    (!parts.is_empty()).then(|| parts.join(" / "))
}

fn build_tldr(title: &str, meta: &NoteMeta, file_refs: &[String], evidence_count: usize) -> Vec<String> {
    let mut bullets = vec![format!("Main issue: {title}.")];
    if let Some(context) = context_line(meta) {
        bullets.push(format!("Context: {context}."));
    }
    if let Some(first) = file_refs.first() {
        bullets.push(format!("Likely location: {first}."));
    }
    if evidence_count > 0 {
        bullets.push(format!("Evidence lines captured: {evidence_count}."));
    }
    if bullets.len() < 3 {
        bullets.push("Next step: review the evidence and reproduce the issue with a minimal case.".to_string());
    }
    bullets.truncate(6);
    bullets
}

fn build_key_findings(evidence_lines: &[String], meta: &NoteMeta, file_refs: &[String]) -> Vec<String> {
    let mut findings = Vec::new();
    for line in evidence_lines {
        if ERROR_RE.is_match(line) {
            findings.push(format!("Error: {}", clean_title_from_line(line)));
        } else if WARNING_RE.is_match(line) {
            findings.push(format!("Warning: {}", clean_title_from_line(line)));
        } else if FILE_LINE_RE.is_match(line) {
            findings.push(format!("Location referenced: {}", line.trim()));
        }
    }
    if !file_refs.is_empty() {
        let shown: Vec<&str> = file_refs.iter().take(3).map(String::as_str).collect();
        findings.push(format!("File references include: {}", shown.join(", ")));
    }
    if !meta.files.is_empty() {
        let shown: Vec<&str> = meta.files.iter().take(5).map(String::as_str).collect();
        findings.push(format!("Files mentioned: {}", shown.join(", ")));
    }
    if !meta.functions.is_empty() {
        let shown: Vec<&str> = meta.functions.iter().take(5).map(String::as_str).collect();
        findings.push(format!("Functions mentioned: {}", shown.join(", ")));
    }
    let mut findings = slug::dedupe_preserve(findings);
    if findings.is_empty() {
        findings.push("No explicit error lines found; review excerpts for context.".to_string());
    }
    findings.truncate(5);
    findings
}

fn build_next_steps(file_refs: &[String], meta: &NoteMeta) -> Vec<String> {
    let mut steps = Vec::new();
    if let Some(first) = file_refs.first() {
        steps.push(format!("Inspect {first} around the referenced line."));
    }
    if !meta.files.is_empty() {
        let shown: Vec<&str> = meta.files.iter().take(3).map(String::as_str).collect();
        steps.push(format!("Review related files: {}.", shown.join(", ")));
    }
    if steps.is_empty() {
        steps.push("Reproduce the issue with a minimal input and capture a short log excerpt.".to_string());
    }
    steps.truncate(5);
    steps
}

fn build_links(text: &str, meta: &NoteMeta) -> Vec<String> {
    let mut links: Vec<String> = meta
        .links
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    links.extend(extract_links(text));
    let mut links = slug::dedupe_preserve(links);
    links.truncate(8);
    links
}

fn build_summary(title: &str, meta: &NoteMeta, evidence_count: usize) -> String {
    let mut parts = vec![format!("Main issue: {title}.")];
    if let Some(context) = context_line(meta) {
        parts.push(format!("Context: {context}."));
    }
    if evidence_count > 0 {
        parts.push(format!("Evidence includes {evidence_count} key lines."));
    }
    parts.truncate(3);
    parts.join(" ")
}
