use gitfacade::git::log::{LogAccumulator, generate_sentinel, log_command};
use gitfacade::git::{is_clean_status, parse_revisions, parse_status, parse_tag_listing};
use gitfacade::GitError;

fn log_output(records: &[&str], sentinel: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for record in records {
        lines.extend(record.lines().map(str::to_string));
        lines.push(sentinel.to_string());
    }
    lines
}

/// Test parsing completely empty git output
#[test]
fn test_parse_empty_outputs() {
    let empty: Vec<String> = Vec::new();

    assert!(parse_revisions(&empty, "end:00000000").unwrap().is_empty());
    assert!(parse_status(&empty).modified.is_empty());
    assert!(parse_tag_listing(&empty).is_empty());
    assert!(!is_clean_status(&empty));
}

/// A message line that merely contains the sentinel does not end the record
#[test]
fn test_sentinel_must_match_whole_line() {
    let sentinel = "end:deadbeef";
    let lines = log_output(
        &["abc;;; mentions end:deadbeef inline\n;;; A;;; a@x.io;;; 10 "],
        sentinel,
    );

    let revisions = parse_revisions(&lines, sentinel).unwrap();
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].message(), "mentions end:deadbeef inline");
}

/// Output from an older run with a different sentinel never closes a record
#[test]
fn test_foreign_sentinel_is_message_text() {
    let lines = log_output(&["abc;;; msg;;; A;;; a@x.io;;; 10 "], "end:11111111");

    assert!(parse_revisions(&lines, "end:22222222").unwrap().is_empty());
}

/// Test parsing commits with very long messages
#[test]
fn test_parse_long_message() {
    let sentinel = generate_sentinel();
    let body = "A".repeat(10000);
    let record = format!("abc;;; {body}\n;;; A;;; a@x.io;;; 10 ");
    let lines = log_output(&[record.as_str()], &sentinel);

    let revisions = parse_revisions(&lines, &sentinel).unwrap();
    assert_eq!(revisions[0].message().len(), 10000);
}

/// Test unicode in author names and messages
#[test]
fn test_parse_unicode_fields() {
    let sentinel = "end:0badcafe";
    let lines = log_output(
        &["abc;;; Añade soporte 日本語 🎉\n;;; José Müller;;; <jose@ejemplo.es>;;; 1700000000 "],
        sentinel,
    );

    let revisions = parse_revisions(&lines, sentinel).unwrap();
    assert_eq!(revisions[0].message(), "Añade soporte 日本語 🎉");
    assert_eq!(revisions[0].author(), "José Müller");
    assert_eq!(revisions[0].email(), "jose@ejemplo.es");
}

/// An error in a later record fails the whole parse
#[test]
fn test_malformed_record_after_valid_one() {
    let sentinel = "end:12345678";
    let lines = log_output(&["abc;;; ok;;; A;;; a@x.io;;; 10 ", "garbage"], sentinel);

    let err = parse_revisions(&lines, sentinel).unwrap_err();
    match err {
        GitError::UnexpectedOutput { output, .. } => assert_eq!(output, "garbage"),
        other => panic!("expected UnexpectedOutput, got {other:?}"),
    }
}

#[test]
fn test_accumulator_reports_dropped_tail() {
    let mut accumulator = LogAccumulator::new("end:abcdef01");
    accumulator.push("abc;;; msg;;; A;;; a@x.io;;; 10 ").unwrap();
    accumulator.push("end:abcdef01").unwrap();
    accumulator.push("def;;; unterminated").unwrap();

    assert!(accumulator.is_collecting());
    assert_eq!(accumulator.finish().as_deref(), Some("def;;; unterminated"));
}

#[test]
fn test_log_command_embeds_sentinel() {
    let sentinel = generate_sentinel();
    let command = log_command(0, false, &sentinel);

    assert!(command.arguments()[2].ends_with(&format!("%n{sentinel}")));
    assert_eq!(command.arguments().last().unwrap(), "-0");
}

/// Test status lines with paths containing the marker text
#[test]
fn test_status_path_with_colon() {
    let report = parse_status(&["\tmodified:   docs/notes: draft.md"]);
    assert_eq!(report.modified, vec!["docs/notes: draft.md"]);
}

/// Renames and deletions are neither modified nor added
#[test]
fn test_status_ignores_other_changes() {
    let report = parse_status(&[
        "\tdeleted:    gone.txt",
        "\trenamed:    old.txt -> new.txt",
        "Untracked files:",
        "\tscratch.txt",
    ]);

    assert!(report.modified.is_empty());
    assert!(report.added.is_empty());
    assert_eq!(report.raw_lines.len(), 4);
}

/// Test tag listings with carriage returns and odd spacing
#[test]
fn test_tag_listing_whitespace() {
    let tags = parse_tag_listing(&["  abc123 \t refs/tags/v1.0\r", "def456\tREFS/TAGS/v2.0"]);

    assert_eq!(tags.get("v1.0"), Some("abc123"));
    assert_eq!(tags.get("v2.0"), Some("def456"));
}

/// Nested tag names keep their slashes
#[test]
fn test_tag_listing_nested_names() {
    let tags = parse_tag_listing(&["abc123\trefs/tags/release/2024/q1"]);
    assert_eq!(tags.tag_for_hash("abc123"), Some("release/2024/q1"));
}
