//! Report persistence.

use anyhow::{Context, Result};
use chrono::Utc;
use qeval_lib::results::RunReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the report as pretty-printed JSON under `report_dir`, creating the
/// directory if needed, and returns the path written.
///
/// File names carry a UTC timestamp so successive runs never overwrite each
/// other.
pub fn write_report(report_dir: &Path, report: &RunReport) -> Result<PathBuf> {
    fs::create_dir_all(report_dir).with_context(|| {
        format!(
            "failed to create report directory {}",
            report_dir.display()
        )
    })?;

    let file_name = format!("qeval_report_{}.json", Utc::now().format("%Y%m%d_%H%M%S"));
    let path = report_dir.join(file_name);

    let file = fs::File::create(&path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("failed to serialize report to {}", path.display()))?;

    info!(path = %path.display(), "Saved full report");
    Ok(path)
}
