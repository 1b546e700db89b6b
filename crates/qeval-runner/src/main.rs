use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use qeval_lib::{config::Settings, dataset, HttpAgent};
use qeval_runner::{renderer, report, run_benchmark};
use std::path::PathBuf;
use tracing::subscriber;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

/// A command-line benchmark runner for question-answering HTTP agents.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Dataset directory containing one JSONL or JSON file per split.
    path: Option<PathBuf>,

    /// Split to run; falls back to the first available split.
    #[arg(long)]
    split: Option<String>,

    /// Agent endpoint the questions are POSTed to.
    #[arg(long)]
    endpoint: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of rows to run; 0 runs the whole split.
    #[arg(long)]
    max_tasks: Option<usize>,

    /// Directory the JSON report is written to.
    #[arg(long)]
    report_dir: Option<PathBuf>,
}

impl Cli {
    /// Environment (with defaults) first, explicit flags on top.
    fn into_settings(self) -> Settings {
        let mut settings = Settings::from_env();
        if let Some(path) = self.path {
            settings.dataset_dir = path;
        }
        if let Some(split) = self.split {
            settings.split = split;
        }
        if let Some(endpoint) = self.endpoint {
            settings.agent_endpoint = endpoint;
        }
        if let Some(timeout) = self.timeout {
            settings.request_timeout_secs = timeout;
        }
        if let Some(max_tasks) = self.max_tasks {
            settings.max_tasks = max_tasks;
        }
        if let Some(report_dir) = self.report_dir {
            settings.report_dir = report_dir;
        }
        settings
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,qeval_lib=debug,qeval_runner=debug"));
    let subscriber = Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());

    subscriber::set_global_default(subscriber)
        .context("Failed to set global default tracing subscriber")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file in the current directory.
    dotenv().ok();
    init_tracing()?;

    let settings = Cli::parse().into_settings();
    println!("--- qeval Benchmark Runner ---");
    println!("Loading dataset from {}...", settings.dataset_dir.display());

    let ds = dataset::load_dataset(&settings.dataset_dir).with_context(|| {
        format!(
            "failed to load dataset from {}",
            settings.dataset_dir.display()
        )
    })?;
    println!("Available splits: {:?}", ds.split_names());

    let agent = HttpAgent::new(
        settings.agent_endpoint.clone(),
        settings.request_timeout_secs,
    );

    let run_report = run_benchmark(&settings, &ds, &agent).await?;

    println!("\n{}", renderer::render_summary_as_tree(&run_report.summary));

    let path = report::write_report(&settings.report_dir, &run_report)?;
    println!("Saved full report to: {}", path.display());

    Ok(())
}
