//! Split-file loading tests over temporary dataset directories.

use qeval_lib::dataset::{choose_split, load_dataset, DatasetError};
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_jsonl_splits_by_file_stem() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("validation.jsonl"),
        "{\"task_id\": \"a\", \"question\": \"q1\"}\n{\"task_id\": \"b\", \"question\": \"q2\"}\n",
    )
    .unwrap();
    fs::write(dir.path().join("test.jsonl"), "{\"task_id\": \"c\"}\n").unwrap();

    let dataset = load_dataset(dir.path()).unwrap();
    assert_eq!(dataset.split_names(), vec!["test", "validation"]);
    assert_eq!(dataset.rows("validation").len(), 2);
    assert_eq!(dataset.rows("test").len(), 1);
    assert_eq!(dataset.rows("validation")[0]["task_id"], "a");
}

#[test]
fn loads_json_array_splits() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("validation.json"),
        r#"[{"question": "q1", "answer": "a1"}, {"question": "q2", "answer": "a2"}]"#,
    )
    .unwrap();

    let dataset = load_dataset(dir.path()).unwrap();
    assert_eq!(dataset.rows("validation").len(), 2);
}

#[test]
fn blank_lines_in_jsonl_are_skipped() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("validation.jsonl"),
        "{\"question\": \"q1\"}\n\n   \n{\"question\": \"q2\"}\n",
    )
    .unwrap();

    let dataset = load_dataset(dir.path()).unwrap();
    assert_eq!(dataset.rows("validation").len(), 2);
}

#[test]
fn empty_split_file_is_a_valid_empty_split() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("validation.jsonl"), "").unwrap();

    let dataset = load_dataset(dir.path()).unwrap();
    assert_eq!(dataset.split_names(), vec!["validation"]);
    assert!(dataset.rows("validation").is_empty());
}

#[test]
fn unrelated_files_are_ignored() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("validation.jsonl"), "{\"question\": \"q\"}\n").unwrap();
    fs::write(dir.path().join("README.md"), "notes").unwrap();

    let dataset = load_dataset(dir.path()).unwrap();
    assert_eq!(dataset.split_names(), vec!["validation"]);
}

#[test]
fn directory_without_split_files_is_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "nothing here").unwrap();

    let err = load_dataset(dir.path()).unwrap_err();
    assert!(matches!(err, DatasetError::NoSplits(_)));
}

#[test]
fn malformed_jsonl_line_reports_its_row() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("validation.jsonl"),
        "{\"question\": \"ok\"}\n{broken\n",
    )
    .unwrap();

    let err = load_dataset(dir.path()).unwrap_err();
    match err {
        DatasetError::Parse { row, .. } => assert_eq!(row, 2),
        other => panic!("expected Parse error, got {other:?}"),
    }
}

#[test]
fn non_object_rows_are_rejected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("validation.jsonl"), "[1, 2, 3]\n").unwrap();

    let err = load_dataset(dir.path()).unwrap_err();
    assert!(matches!(err, DatasetError::NotAnObject { row: 1, .. }));
}

#[test]
fn choose_split_falls_back_to_first_sorted() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("zeta.jsonl"), "").unwrap();
    fs::write(dir.path().join("alpha.jsonl"), "").unwrap();

    let dataset = load_dataset(dir.path()).unwrap();
    assert_eq!(choose_split(&dataset, "alpha"), Some("alpha"));
    assert_eq!(choose_split(&dataset, "missing"), Some("alpha"));
}
