//! Dataset loading and task-field extraction.
//!
//! A dataset is a directory with one file per split: `<split>.jsonl` (one
//! JSON object per line) or `<split>.json` (a top-level array of objects).
//! Rows keep their raw column names; nothing is interpreted until
//! [`extract_task_fields`] reduces a row to the three fields the runner
//! needs.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Candidate column names for the task id, in lookup order.
pub const TASK_ID_KEYS: [&str; 4] = ["task_id", "Task ID", "id", "Id"];
/// Candidate column names for the question text, in lookup order.
pub const QUESTION_KEYS: [&str; 4] = ["Question", "question", "prompt", "input"];
/// Candidate column names for the gold answer, in lookup order.
pub const ANSWER_KEYS: [&str; 6] = [
    "Final answer",
    "final_answer",
    "answer",
    "gold",
    "target",
    "label",
];

/// A raw dataset row: column name to value, column names unpredictable.
pub type Row = Map<String, Value>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?} (row {row})")]
    Parse {
        path: PathBuf,
        row: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("row {row} of {path:?} is not a JSON object")]
    NotAnObject { path: PathBuf, row: usize },
    #[error("no split files (*.jsonl, *.json) found under {0:?}")]
    NoSplits(PathBuf),
}

/// A loaded dataset: named splits in deterministic (sorted) order.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    splits: BTreeMap<String, Vec<Row>>,
}

impl Dataset {
    /// Split names in sorted order.
    pub fn split_names(&self) -> Vec<&str> {
        self.splits.keys().map(String::as_str).collect()
    }

    /// Rows of a split; empty when the split does not exist.
    pub fn rows(&self, split: &str) -> &[Row] {
        self.splits.get(split).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_split(&self, split: &str) -> bool {
        self.splits.contains_key(split)
    }

    #[cfg(test)]
    pub(crate) fn from_splits(splits: BTreeMap<String, Vec<Row>>) -> Self {
        Self { splits }
    }
}

/// Loads every split file found directly under `dir`.
///
/// The split name is the file stem; a directory with `validation.jsonl` and
/// `test.jsonl` yields the splits `["test", "validation"]`. Files with other
/// extensions are ignored. An empty split file is a valid split with zero
/// rows, but a directory with no split files at all is an error.
pub fn load_dataset(dir: &Path) -> Result<Dataset, DatasetError> {
    let entries = fs::read_dir(dir).map_err(|source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut splits = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|source| DatasetError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let rows = match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") => load_jsonl(&path)?,
            Some("json") => load_json_array(&path)?,
            _ => continue,
        };

        debug!(split = stem, rows = rows.len(), "Loaded split file");
        splits.insert(stem.to_string(), rows);
    }

    if splits.is_empty() {
        return Err(DatasetError::NoSplits(dir.to_path_buf()));
    }

    info!(
        splits = ?splits.keys().collect::<Vec<_>>(),
        "Dataset loaded"
    );
    Ok(Dataset { splits })
}

fn load_jsonl(path: &Path) -> Result<Vec<Row>, DatasetError> {
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rows = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value =
            serde_json::from_str(line).map_err(|source| DatasetError::Parse {
                path: path.to_path_buf(),
                row: i + 1,
                source,
            })?;
        match value {
            Value::Object(row) => rows.push(row),
            _ => {
                return Err(DatasetError::NotAnObject {
                    path: path.to_path_buf(),
                    row: i + 1,
                })
            }
        }
    }
    Ok(rows)
}

fn load_json_array(path: &Path) -> Result<Vec<Row>, DatasetError> {
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        row: 0,
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(DatasetError::NotAnObject {
            path: path.to_path_buf(),
            row: 0,
        });
    };

    let mut rows = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(row) => rows.push(row),
            _ => {
                return Err(DatasetError::NotAnObject {
                    path: path.to_path_buf(),
                    row: i + 1,
                })
            }
        }
    }
    Ok(rows)
}

/// Picks the preferred split when present, otherwise the first available one.
pub fn choose_split<'a>(dataset: &'a Dataset, preferred: &str) -> Option<&'a str> {
    dataset
        .splits
        .get_key_value(preferred)
        .map(|(name, _)| name.as_str())
        .or_else(|| dataset.splits.keys().next().map(String::as_str))
}

/// A dataset row reduced to the fields the run loop needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub task_id: String,
    pub question: String,
    pub gold_answer: String,
}

/// Reduces a raw row to a [`TaskRow`] via the fixed candidate key lists.
///
/// The task id falls back to a positional `row_<index>` placeholder when no
/// candidate yields usable text; question and gold answer fall back to the
/// empty string, which the run loop records as a data-quality failure.
pub fn extract_task_fields(row: &Row, index: usize) -> TaskRow {
    let task_id = first_present(row, &TASK_ID_KEYS)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("row_{index}"));
    let question = first_present(row, &QUESTION_KEYS).unwrap_or_default();
    let gold_answer = first_present(row, &ANSWER_KEYS).unwrap_or_default();

    TaskRow {
        task_id,
        question,
        gold_answer,
    }
}

/// First candidate key present with a non-null value, stringified.
fn first_present(row: &Row, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|key| match row.get(*key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn extracts_canonical_columns() {
        let task = extract_task_fields(
            &row(json!({
                "task_id": "t-1",
                "Question": "What is the capital of France?",
                "Final answer": "Paris"
            })),
            0,
        );
        assert_eq!(task.task_id, "t-1");
        assert_eq!(task.question, "What is the capital of France?");
        assert_eq!(task.gold_answer, "Paris");
    }

    #[test]
    fn candidate_order_is_respected() {
        // "Question" outranks "prompt"; "Final answer" outranks "answer".
        let task = extract_task_fields(
            &row(json!({
                "prompt": "from prompt",
                "Question": "from question",
                "answer": "from answer",
                "Final answer": "from final answer"
            })),
            0,
        );
        assert_eq!(task.question, "from question");
        assert_eq!(task.gold_answer, "from final answer");
    }

    #[test]
    fn null_values_fall_through_to_later_candidates() {
        let task = extract_task_fields(
            &row(json!({"Question": null, "prompt": "fallback"})),
            0,
        );
        assert_eq!(task.question, "fallback");
    }

    #[test]
    fn task_id_placeholder_is_positional() {
        let task = extract_task_fields(&row(json!({"question": "q"})), 17);
        assert_eq!(task.task_id, "row_17");
    }

    #[test]
    fn empty_task_id_gets_placeholder() {
        let task = extract_task_fields(&row(json!({"task_id": ""})), 3);
        assert_eq!(task.task_id, "row_3");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let task = extract_task_fields(&row(json!({"unrelated": 1})), 0);
        assert_eq!(task.question, "");
        assert_eq!(task.gold_answer, "");
    }

    #[test]
    fn non_string_values_are_stringified() {
        let task = extract_task_fields(&row(json!({"id": 42, "gold": 3.5})), 0);
        assert_eq!(task.task_id, "42");
        assert_eq!(task.gold_answer, "3.5");
    }

    #[test]
    fn choose_split_prefers_then_falls_back() {
        let mut splits = BTreeMap::new();
        splits.insert("test".to_string(), vec![]);
        splits.insert("validation".to_string(), vec![]);
        let dataset = Dataset::from_splits(splits);

        assert_eq!(choose_split(&dataset, "validation"), Some("validation"));
        assert_eq!(choose_split(&dataset, "train"), Some("test"));
        assert_eq!(choose_split(&Dataset::default(), "validation"), None);
    }
}
