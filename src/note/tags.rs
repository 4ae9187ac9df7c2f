use crate::note::slug::{dedupe_preserve, normalize_tag};
use crate::note::NoteMeta;

/// Maximum number of tags on a note.
pub const MAX_TAGS: usize = 12;

/// Fixed keyword vocabulary matched against the text: language names, error
/// keywords, and topic words. The left side is the keyword looked up with
/// word boundaries; the right side is the tag it produces.
const VOCABULARY: &[(&str, &str)] = &[
    // languages and toolchains
    ("rust", "rust"),
    ("python", "python"),
    ("javascript", "javascript"),
    ("typescript", "typescript"),
    ("golang", "go"),
    ("java", "java"),
    ("c++", "cpp"),
    ("c99", "c99"),
    ("makefile", "make"),
    ("cmake", "cmake"),
    ("docker", "docker"),
    // error keywords
    ("error", "error"),
    ("warning", "warning"),
    ("fatal", "fatal"),
    ("panic", "panic"),
    ("exception", "exception"),
    ("traceback", "traceback"),
    ("segfault", "segfault"),
    ("linker", "linker"),
    ("implicit declaration", "implicit-declaration"),
    ("redefinition", "redefinition"),
    ("undefined reference", "undefined-reference"),
    // topic words
    ("build", "build"),
    ("deploy", "deploy"),
    ("migration", "migration"),
    ("database", "database"),
    ("network", "network"),
    ("timeout", "timeout"),
    ("memory", "memory"),
    ("regression", "regression"),
    ("dependency", "dependency"),
];

/// Build the tag list: explicit meta tags first, then vocabulary matches
/// ordered by first occurrence in the text; normalized, deduplicated,
/// capped at [`MAX_TAGS`].
pub fn build_tags(text: &str, meta: &NoteMeta) -> Vec<String> {
    let mut tags: Vec<String> = meta
        .tags
        .iter()
        .map(|t| normalize_tag(t))
        .filter(|t| !t.is_empty())
        .collect();

    let lower = text.to_lowercase();
    let mut matched: Vec<(usize, &str)> = VOCABULARY
        .iter()
        .filter_map(|&(keyword, tag)| first_word_occurrence(&lower, keyword).map(|pos| (pos, tag)))
        .collect();
    matched.sort_by_key(|(pos, _)| *pos);
    tags.extend(matched.into_iter().map(|(_, tag)| tag.to_string()));

    let mut tags = dedupe_preserve(tags);
    tags.truncate(MAX_TAGS);
    tags
}

/// First occurrence of `keyword` in `text` with non-alphanumeric characters
/// (or the text ends) on both sides.
fn first_word_occurrence(text: &str, keyword: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while let Some(pos) = text[start..].find(keyword) {
        let abs = start + pos;
        let end = abs + keyword.len();
        let before_ok = abs == 0 || !bytes[abs - 1].is_ascii_alphanumeric();
        let after_ok = end >= text.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return Some(abs);
        }
        start = abs + 1;
    }
    None
}
