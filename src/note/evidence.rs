use once_cell::sync::Lazy;
use regex::Regex;

use crate::note::slug::dedupe_preserve;

/// Default number of evidence excerpts kept per note.
pub const DEFAULT_MAX_EXCERPT_LINES: usize = 8;

/// Maximum length of a single evidence line, in characters.
pub const MAX_LINE_LEN: usize = 300;

pub(crate) static FILE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z0-9_./\\-]+):(\d+)(?::(\d+))?").expect("valid file ref regex")
});
pub(crate) static ERROR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(error|fatal|exception|traceback)\b").expect("valid error regex"));
pub(crate) static WARNING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bwarning\b").expect("valid warning regex"));
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));

/// Score one line for evidence value. Zero means not evidence.
fn score_line(line: &str) -> u32 {
    let lower = line.to_lowercase();
    let mut score = 0;
    if lower.contains("error") {
        score += 3;
    }
    if lower.contains("fatal") {
        score += 3;
    }
    if lower.contains("exception") {
        score += 2;
    }
    if lower.contains("traceback") {
        score += 2;
    }
    if lower.contains("warning") {
        score += 1;
    }
    if FILE_LINE_RE.is_match(line) {
        score += 2;
    }
    score
}

/// Select the most relevant lines as evidence: highest score first, original
/// order restored in the output, padded with leading lines when fewer than
/// three matches, deduplicated and capped at `max_lines`.
pub fn select_evidence(lines: &[&str], max_lines: usize) -> Vec<String> {
    let nonempty: Vec<&str> = lines.iter().copied().filter(|l| !l.trim().is_empty()).collect();

    let mut scored: Vec<(u32, usize, &str)> = nonempty
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let score = score_line(line);
            (score > 0).then_some((score, idx, *line))
        })
        .collect();

    let mut selected: Vec<(usize, &str)> = if scored.is_empty() {
        nonempty.iter().copied().enumerate().take(max_lines).collect()
    } else {
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.truncate(max_lines);
        let mut picked: Vec<(usize, &str)> = scored.into_iter().map(|(_, idx, l)| (idx, l)).collect();
        picked.sort_by_key(|(idx, _)| *idx);
        picked
    };

    let mut out = dedupe_preserve(selected.drain(..).map(|(_, l)| l.to_string()).collect());

    // Pad with leading lines so a sparse match still reads as a summary.
    let want = 3.min(max_lines).min(nonempty.len());
    if out.len() < want {
        for line in &nonempty {
            if out.iter().any(|l| l == line) {
                continue;
            }
            out.push((*line).to_string());
            if out.len() >= want {
                break;
            }
        }
    }

    out.truncate(max_lines);
    out.iter().map(|l| sanitize_line(l)).collect()
}

/// Extract `<path>:<line>[:<col>]` references in original order, deduplicated.
pub fn extract_file_refs(lines: &[&str]) -> Vec<String> {
    let refs = lines
        .iter()
        .filter_map(|line| {
            FILE_LINE_RE.captures(line).map(|caps| {
                let mut r = format!("{}:{}", &caps[1], &caps[2]);
                if let Some(col) = caps.get(3) {
                    r.push(':');
                    r.push_str(col.as_str());
                }
                r
            })
        })
        .collect();
    dedupe_preserve(refs)
}

/// Collect http(s) links found in the text, in order, deduplicated.
pub fn extract_links(text: &str) -> Vec<String> {
    dedupe_preserve(URL_RE.find_iter(text).map(|m| m.as_str().to_string()).collect())
}

/// Cap one evidence line at [`MAX_LINE_LEN`] characters.
fn sanitize_line(line: &str) -> String {
    let line = line.trim_end_matches('\n');
    if line.chars().count() <= MAX_LINE_LEN {
        return line.to_string();
    }
    let mut out: String = line.chars().take(MAX_LINE_LEN - 3).collect();
    out.push_str("...");
    out
}
