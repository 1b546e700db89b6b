//! Per-row results and the end-of-run summary.

use crate::agent::FailureKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The terminal record for one processed dataset row. Immutable once
/// appended to the run's result list.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RowResult {
    pub task_id: String,
    /// True only for scored rows whose answer exact-matched the gold.
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    pub latency_ms: u64,
    pub gold: String,
    pub predicted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,
}

impl RowResult {
    /// A row that could not be scored, with the failure kind saying why.
    pub fn failed(
        task_id: String,
        kind: FailureKind,
        latency_ms: u64,
        gold: String,
        raw_response: Option<Value>,
    ) -> Self {
        Self {
            task_id,
            correct: false,
            failure_kind: Some(kind),
            latency_ms,
            gold,
            predicted: String::new(),
            raw_response,
        }
    }

    /// A row that reached the scorer.
    pub fn scored(
        task_id: String,
        correct: bool,
        latency_ms: u64,
        gold: String,
        predicted: String,
        raw_response: Option<Value>,
    ) -> Self {
        Self {
            task_id,
            correct,
            failure_kind: None,
            latency_ms,
            gold,
            predicted,
            raw_response,
        }
    }
}

/// Aggregate statistics for a run, computed once from the full result list.
///
/// Invariant: `scored_rows <= rows_executed <= total_rows`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub timestamp_utc: DateTime<Utc>,
    pub dataset_dir: String,
    pub split: String,
    pub agent_endpoint: String,
    pub total_rows: usize,
    pub rows_executed: usize,
    pub scored_rows: usize,
    pub correct: usize,
    /// `correct / scored_rows`, or 0 when nothing was scored.
    pub accuracy: f64,
    /// Mean over rows with `latency_ms > 0`, or 0 when there are none.
    pub avg_latency_ms: f64,
    pub failure_counts: BTreeMap<FailureKind, u64>,
}

/// The full report document written to disk.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    pub results: Vec<RowResult>,
}

/// Rounds to `places` decimal places for report output.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
