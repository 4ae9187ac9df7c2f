use once_cell::sync::Lazy;
use regex::Regex;

use crate::note::evidence::{ERROR_RE, WARNING_RE};
use crate::note::NoteMeta;

/// Maximum length of an inferred title, in characters.
pub const MAX_TITLE_LEN: usize = 120;

static TIMESTAMP_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[?\d{4}-\d{2}-\d{2}[^\]]*\]?\s*").expect("valid timestamp regex"));
static SEVERITY_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(error|fatal|exception|warning)[:\s-]+").expect("valid severity regex")
});
static ERROR_TAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\berror\b\s*[:\-]?\s*(.+)").expect("valid error tail regex"));

/// Turn a log line into a readable title: strip a leading timestamp, strip a
/// leading severity word, prefer the text after `error:` when present, cap
/// at [`MAX_TITLE_LEN`].
pub fn clean_title_from_line(line: &str) -> String {
    let original = line.trim();
    let mut cleaned = TIMESTAMP_PREFIX_RE.replace(original, "").into_owned();
    cleaned = SEVERITY_PREFIX_RE.replace(&cleaned, "").into_owned();
    let error_tail = ERROR_TAIL_RE.captures(&cleaned).and_then(|caps| {
        let tail = caps[1].trim();
        (!tail.is_empty()).then(|| tail.to_string())
    });
    if let Some(tail) = error_tail {
        cleaned = tail;
    }
    let mut cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        cleaned = original.to_string();
    }
    if cleaned.chars().count() > MAX_TITLE_LEN {
        cleaned = cleaned.chars().take(MAX_TITLE_LEN - 3).collect();
        cleaned.push_str("...");
    }
    cleaned
}

/// Infer a note title: first error/warning line, then meta project/topic,
/// then the first non-blank line, then a generic fallback.
pub fn infer_title(lines: &[&str], meta: &NoteMeta) -> String {
    for line in lines {
        if ERROR_RE.is_match(line) || WARNING_RE.is_match(line) {
            return clean_title_from_line(line);
        }
    }
    match (&meta.project, &meta.topic) {
        (Some(project), Some(topic)) => return format!("{project}: {topic}"),
        (None, Some(topic)) => return topic.clone(),
        _ => {}
    }
    if let Some(line) = lines.iter().find(|l| !l.trim().is_empty()) {
        return clean_title_from_line(line);
    }
    if let Some(project) = &meta.project {
        return project.clone();
    }
    "Notes summary".to_string()
}
