use once_cell::sync::Lazy;
use regex::Regex;

use crate::note::{NoteBody, NoteRecord};

static YAML_BARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._/-]+$").expect("valid yaml bare regex"));

/// Quote a YAML scalar unless it is safe to emit bare.
fn yaml_scalar(value: &str) -> String {
    if YAML_BARE_RE.is_match(value) {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Inline YAML list of already-normalized tags.
fn yaml_inline_list(items: &[String]) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    format!("[{}]", items.join(", "))
}

/// Render the full note file: YAML front matter, a blank line, then the body.
/// In document mode the body is the input text verbatim.
pub fn render(record: &NoteRecord) -> String {
    let front = [
        "---".to_string(),
        format!("title: {}", yaml_scalar(&record.title)),
        format!("id: {}", record.note_id),
        format!("date: {}", record.date.format("%Y-%m-%d")),
        format!("project: {}", yaml_scalar(&record.project)),
        format!("topic: {}", yaml_scalar(&record.topic)),
        format!("tags: {}", yaml_inline_list(&record.tags)),
        format!("source: {}", yaml_scalar(&record.source)),
        format!("confidence: {}", record.confidence),
        "---".to_string(),
        String::new(),
    ]
    .join("\n");

    match &record.body {
        NoteBody::Document(text) => format!("{front}\n{text}"),
        NoteBody::Summary {
            tldr,
            findings,
            next_steps,
            links,
        } => {
            let mut body: Vec<String> = vec![
                format!("# {}", record.title),
                String::new(),
                "## TL;DR".to_string(),
            ];
            for bullet in tldr {
                body.push(format!("- {bullet}"));
            }
            body.push(String::new());
            body.push("## Key findings".to_string());
            for bullet in findings {
                body.push(format!("- {bullet}"));
            }
            body.push(String::new());
            body.push("## Evidence (excerpts)".to_string());
            if record.evidence.is_empty() {
                body.push("- (no excerpts found)".to_string());
            } else {
                for line in &record.evidence {
                    body.push(format!("- {line}"));
                }
            }
            body.push(String::new());
            body.push("## Next steps".to_string());
            for bullet in next_steps {
                body.push(format!("- {bullet}"));
            }
            body.push(String::new());
            body.push("## Links / References".to_string());
            if links.is_empty() {
                body.push("- (none)".to_string());
            } else {
                for link in links {
                    body.push(format!("- {link}"));
                }
            }
            body.push(String::new());
            format!("{front}\n{}", body.join("\n"))
        }
    }
}
