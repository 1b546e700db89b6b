use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use qeval_lib::{
    agent::{Agent, FailureKind},
    config::Settings,
    dataset::{self, Dataset},
    results::{round_to, RowResult, RunReport, RunSummary},
    score::exact_match_score,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

pub mod renderer;
pub mod report;

/// Runs the benchmark over the chosen split and returns the full report.
///
/// Rows are processed strictly one at a time; each agent call completes (or
/// times out) before the next row starts. A row's failure is recorded and
/// the loop moves on; nothing a single row does can abort the run.
#[instrument(skip_all, name = "run_benchmark")]
pub async fn run_benchmark(
    settings: &Settings,
    dataset: &Dataset,
    agent: &dyn Agent,
) -> Result<RunReport> {
    let split = dataset::choose_split(dataset, &settings.split)
        .context("dataset has no splits to run")?;
    if split != settings.split {
        info!(
            requested = %settings.split,
            chosen = %split,
            "Preferred split not present, falling back to first available"
        );
    }

    let rows = dataset.rows(split);
    let total_rows = rows.len();
    let rows_to_run = if settings.max_tasks == 0 {
        total_rows
    } else {
        settings.max_tasks.min(total_rows)
    };

    if let Some(first) = rows.first() {
        debug!(columns = ?first.keys().collect::<Vec<_>>(), "Split columns");
    }
    info!(split, total_rows, rows_to_run, "Starting benchmark run");

    let progress = ProgressBar::new(rows_to_run as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("invalid progress bar template")?,
    );

    let mut results: Vec<RowResult> = Vec::with_capacity(rows_to_run);
    let mut failure_counts: BTreeMap<FailureKind, u64> = BTreeMap::new();
    let mut scored = 0usize;
    let mut correct = 0usize;

    for (index, row) in rows.iter().take(rows_to_run).enumerate() {
        let task = dataset::extract_task_fields(row, index);
        progress.set_message(task.task_id.clone());

        // Data-quality short circuits: no network call without both fields.
        if task.question.is_empty() {
            debug!(task_id = %task.task_id, "Row has no question");
            *failure_counts
                .entry(FailureKind::MissingQuestion)
                .or_default() += 1;
            results.push(RowResult::failed(
                task.task_id,
                FailureKind::MissingQuestion,
                0,
                task.gold_answer,
                None,
            ));
            progress.inc(1);
            continue;
        }
        if task.gold_answer.is_empty() {
            // Splits that hide gold answers cannot be exact-match scored
            // locally.
            debug!(task_id = %task.task_id, "Row exposes no gold answer");
            *failure_counts
                .entry(FailureKind::MissingGoldAnswer)
                .or_default() += 1;
            results.push(RowResult::failed(
                task.task_id,
                FailureKind::MissingGoldAnswer,
                0,
                String::new(),
                None,
            ));
            progress.inc(1);
            continue;
        }

        let outcome = agent.invoke(&task.question).await;

        if let Some(kind) = outcome.failure_kind {
            warn!(task_id = %task.task_id, failure = %kind, "Agent invocation failed");
            *failure_counts.entry(kind).or_default() += 1;
            results.push(RowResult::failed(
                task.task_id,
                kind,
                outcome.latency_ms,
                task.gold_answer,
                outcome.raw_response,
            ));
            progress.inc(1);
            continue;
        }

        let is_correct = exact_match_score(&outcome.predicted_answer, &task.gold_answer);
        scored += 1;
        if is_correct {
            correct += 1;
        }
        debug!(
            task_id = %task.task_id,
            correct = is_correct,
            latency_ms = outcome.latency_ms,
            "Row scored"
        );
        results.push(RowResult::scored(
            task.task_id,
            is_correct,
            outcome.latency_ms,
            task.gold_answer,
            outcome.predicted_answer,
            outcome.raw_response,
        ));
        progress.inc(1);
    }
    progress.finish_and_clear();

    let summary = build_summary(
        settings,
        split,
        total_rows,
        rows_to_run,
        scored,
        correct,
        &results,
        failure_counts,
    );
    info!(
        run_id = %summary.run_id,
        accuracy = summary.accuracy,
        scored_rows = summary.scored_rows,
        "Benchmark run finished"
    );

    Ok(RunReport { summary, results })
}

#[allow(clippy::too_many_arguments)]
fn build_summary(
    settings: &Settings,
    split: &str,
    total_rows: usize,
    rows_executed: usize,
    scored_rows: usize,
    correct: usize,
    results: &[RowResult],
    failure_counts: BTreeMap<FailureKind, u64>,
) -> RunSummary {
    let accuracy = if scored_rows > 0 {
        correct as f64 / scored_rows as f64
    } else {
        0.0
    };

    let timed: Vec<u64> = results
        .iter()
        .filter(|r| r.latency_ms > 0)
        .map(|r| r.latency_ms)
        .collect();
    let avg_latency_ms = if timed.is_empty() {
        0.0
    } else {
        timed.iter().sum::<u64>() as f64 / timed.len() as f64
    };

    RunSummary {
        run_id: uuid::Uuid::new_v4().to_string(),
        timestamp_utc: chrono::Utc::now(),
        dataset_dir: settings.dataset_dir.display().to_string(),
        split: split.to_string(),
        agent_endpoint: settings.agent_endpoint.clone(),
        total_rows,
        rows_executed,
        scored_rows,
        correct,
        accuracy: round_to(accuracy, 6),
        avg_latency_ms: round_to(avg_latency_ms, 2),
        failure_counts,
    }
}
