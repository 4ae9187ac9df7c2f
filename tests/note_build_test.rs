use std::path::Path;

use notesmith::note::{self, Mode, NoteBody, NoteInput, NoteMeta};

fn base_input(text: &str) -> NoteInput {
    NoteInput {
        text: text.to_string(),
        meta: NoteMeta::default(),
        slug_hint: None,
        mode: Mode::Auto,
        notes_repo_path: None,
        date: Some("2026-02-24".to_string()),
        max_excerpt_lines: None,
    }
}

fn read_body(path: &Path) -> String {
    let content = std::fs::read_to_string(path).unwrap();
    content
        .split_once("\n---\n\n")
        .map(|(_, body)| body.to_string())
        .unwrap()
}

#[test]
fn build_failure_example_is_document_mode() {
    let repo = tempfile::tempdir().unwrap();
    let text = "# Build failed\nerror: linker exited 1\nsrc/main.c:42";
    let mut input = base_input(text);
    input.meta.project = Some("demo".to_string());

    let record = note::build_note(&input, repo.path()).unwrap();

    assert_eq!(record.title, "Build failed");
    assert!(matches!(record.body, NoteBody::Document(_)));
    assert!(record.tags.iter().any(|t| t == "error"));
    assert!(record.evidence.iter().any(|l| l.contains("src/main.c:42")));

    let path = note::write_note(&record).unwrap();
    assert_eq!(read_body(&path), text);
}

#[test]
fn path_lands_in_zero_padded_date_bucket() {
    let repo = tempfile::tempdir().unwrap();
    let mut input = base_input("just a thought");
    input.date = Some("2026-02-04".to_string());

    let record = note::build_note(&input, repo.path()).unwrap();
    let path = note::write_note(&record).unwrap();

    assert!(path.starts_with(repo.path()));
    let relative = path.strip_prefix(repo.path()).unwrap();
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    assert_eq!(parts[0], "notes");
    assert_eq!(parts[1], "2026");
    assert_eq!(parts[2], "2026-02");
    assert!(parts[3].starts_with("2026-02-04-"));
    assert!(parts[3].ends_with(".md"));
}

#[test]
fn slug_precedence_meta_then_hint_then_title() {
    let repo = tempfile::tempdir().unwrap();

    let mut input = base_input("error: it broke");
    input.meta.project = Some("My Project".to_string());
    input.meta.topic = Some("CI".to_string());
    input.slug_hint = Some("ignored hint".to_string());
    let record = note::build_note(&input, repo.path()).unwrap();
    assert_eq!(record.slug, "my-project-ci");

    let mut input = base_input("error: it broke");
    input.slug_hint = Some("Linker Trouble".to_string());
    let record = note::build_note(&input, repo.path()).unwrap();
    assert_eq!(record.slug, "linker-trouble");

    let input = base_input("error: it broke");
    let record = note::build_note(&input, repo.path()).unwrap();
    assert_eq!(record.slug, "it-broke");
}

#[test]
fn repeated_identical_input_is_idempotent() {
    let repo = tempfile::tempdir().unwrap();
    let input = base_input("error: flaky test timed out");

    let first = note::build_note(&input, repo.path()).unwrap();
    let second = note::build_note(&input, repo.path()).unwrap();
    assert_eq!(first.path, second.path);
    assert_eq!(first.note_id, second.note_id);

    note::write_note(&first).unwrap();
    // identical content at the same path is a no-op, not an error
    note::write_note(&second).unwrap();
}

#[test]
fn same_day_same_slug_different_text_gets_distinct_files() {
    let repo = tempfile::tempdir().unwrap();

    let mut a = base_input("error: first failure");
    a.slug_hint = Some("shared-slug".to_string());
    let mut b = base_input("error: second failure");
    b.slug_hint = Some("shared-slug".to_string());

    let record_a = note::build_note(&a, repo.path()).unwrap();
    let record_b = note::build_note(&b, repo.path()).unwrap();

    assert_ne!(record_a.path, record_b.path);
    note::write_note(&record_a).unwrap();
    note::write_note(&record_b).unwrap();
}

#[test]
fn tampered_existing_note_is_never_overwritten() {
    let repo = tempfile::tempdir().unwrap();
    let input = base_input("error: something broke");

    let record = note::build_note(&input, repo.path()).unwrap();
    let path = note::write_note(&record).unwrap();

    std::fs::write(&path, "manually edited").unwrap();

    let record = note::build_note(&input, repo.path()).unwrap();
    let err = note::write_note(&record).unwrap_err();
    assert!(err.to_string().contains("refusing to overwrite"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "manually edited");
}

#[test]
fn summary_mode_renders_sections() {
    let repo = tempfile::tempdir().unwrap();
    let input = base_input("building demo\nerror: linker exited 1\nsrc/main.c:42\ndone");

    let record = note::build_note(&input, repo.path()).unwrap();
    assert_eq!(record.title, "linker exited 1");
    assert!(matches!(record.body, NoteBody::Summary { .. }));

    let path = note::write_note(&record).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    for key in ["title:", "date: 2026-02-24", "tags:", "source: chat"] {
        assert!(content.contains(key), "missing {key}");
    }
    for section in ["## TL;DR", "## Key findings", "## Evidence (excerpts)", "## Next steps"] {
        assert!(content.contains(section), "missing {section}");
    }
}

#[test]
fn forced_summary_mode_overrides_heading_detection() {
    let repo = tempfile::tempdir().unwrap();
    let mut input = base_input("# Looks like a document\nbut treat it as raw text");
    input.mode = Mode::Summary;

    let record = note::build_note(&input, repo.path()).unwrap();
    assert!(matches!(record.body, NoteBody::Summary { .. }));
}

#[test]
fn blank_text_is_a_validation_error() {
    let repo = tempfile::tempdir().unwrap();
    let input = base_input("   \n  ");
    let err = note::build_note(&input, repo.path()).unwrap_err();
    assert!(err.to_string().contains("text is required"));
}

#[test]
fn missing_repo_directory_is_a_config_error() {
    let input = base_input("error: anything");
    let err = note::build_note(&input, Path::new("/nonexistent/notes-repo")).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn bad_date_is_a_validation_error() {
    let repo = tempfile::tempdir().unwrap();
    let mut input = base_input("error: anything");
    input.date = Some("24-02-2026".to_string());
    let err = note::build_note(&input, repo.path()).unwrap_err();
    assert!(err.to_string().contains("YYYY-MM-DD"));
}

#[test]
fn tag_cap_holds_for_keyword_dense_text() {
    let repo = tempfile::tempdir().unwrap();
    let text = "rust python javascript typescript golang java build deploy \
                error warning fatal panic exception traceback segfault linker \
                database network timeout memory regression dependency";
    let input = base_input(text);

    let record = note::build_note(&input, repo.path()).unwrap();
    assert!(record.tags.len() <= 12);
    let mut deduped = record.tags.clone();
    deduped.dedup();
    assert_eq!(deduped, record.tags);
}
