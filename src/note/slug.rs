use std::collections::HashSet;

/// Maximum slug length in the note filename.
pub const MAX_SLUG_LEN: usize = 40;

/// Normalize text into a URL-safe slug: lowercase, non-alphanumeric runs
/// collapsed to a single dash, trimmed, capped at [`MAX_SLUG_LEN`].
pub fn slugify(value: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for ch in value.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    if slug.len() > MAX_SLUG_LEN {
        // only ascii alphanumerics and dashes by construction
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    if slug.is_empty() {
        "note".to_string()
    } else {
        slug
    }
}

/// Normalize a tag: lowercase, whitespace runs to a single dash, everything
/// outside `[a-z0-9-]` dropped, dash runs collapsed, ends trimmed.
pub fn normalize_tag(tag: &str) -> String {
    let mut out = String::new();
    let mut pending_dash = false;
    for ch in tag.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        } else if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            out.push(ch);
            pending_dash = false;
        }
    }
    out
}

/// Drop duplicates while keeping first-occurrence order.
pub fn dedupe_preserve(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
