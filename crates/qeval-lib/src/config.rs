//! Process configuration.
//!
//! Settings are resolved once (environment variables with defaults, CLI
//! overrides applied by the binary) and passed by value into the orchestrator
//! and agent. Nothing below the entry point reads the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_AGENT_ENDPOINT: &str = "http://127.0.0.1:8090/invoke";
pub const DEFAULT_SPLIT: &str = "validation";
pub const DEFAULT_DATASET_DIR: &str = "dataset";
pub const DEFAULT_REPORT_DIR: &str = "reports";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 120;

/// Everything a run needs to know, in one value.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding one split file per split.
    pub dataset_dir: PathBuf,
    /// Preferred split; the run falls back to the first available one.
    pub split: String,
    /// The agent's invoke endpoint.
    pub agent_endpoint: String,
    /// Hard per-request deadline.
    pub request_timeout_secs: u64,
    /// Upper bound on rows to run; 0 runs the whole split.
    pub max_tasks: usize,
    /// Directory the JSON report is written to.
    pub report_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from(DEFAULT_DATASET_DIR),
            split: DEFAULT_SPLIT.to_string(),
            agent_endpoint: DEFAULT_AGENT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            max_tasks: 0,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
        }
    }
}

impl Settings {
    /// Reads settings from `QEVAL_*` environment variables, falling back to
    /// the defaults above for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            dataset_dir: env::var("QEVAL_DATASET_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATASET_DIR)),
            split: env::var("QEVAL_SPLIT").unwrap_or_else(|_| DEFAULT_SPLIT.to_string()),
            agent_endpoint: env::var("QEVAL_AGENT_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_AGENT_ENDPOINT.to_string()),
            request_timeout_secs: env_parsed(
                "QEVAL_REQUEST_TIMEOUT_SECONDS",
                DEFAULT_REQUEST_TIMEOUT_SECONDS,
            ),
            max_tasks: env_parsed("QEVAL_MAX_TASKS", 0usize),
            report_dir: env::var("QEVAL_REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_REPORT_DIR)),
        }
    }
}

fn env_parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| T::from_str(&s).ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_qeval_env() {
        for key in [
            "QEVAL_DATASET_DIR",
            "QEVAL_SPLIT",
            "QEVAL_AGENT_ENDPOINT",
            "QEVAL_REQUEST_TIMEOUT_SECONDS",
            "QEVAL_MAX_TASKS",
            "QEVAL_REPORT_DIR",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_when_environment_is_empty() {
        clear_qeval_env();
        let settings = Settings::from_env();
        assert_eq!(settings.agent_endpoint, DEFAULT_AGENT_ENDPOINT);
        assert_eq!(settings.split, DEFAULT_SPLIT);
        assert_eq!(settings.request_timeout_secs, 120);
        assert_eq!(settings.max_tasks, 0);
    }

    #[test]
    #[serial]
    fn environment_overrides_defaults() {
        clear_qeval_env();
        env::set_var("QEVAL_AGENT_ENDPOINT", "http://10.0.0.5:9000/invoke");
        env::set_var("QEVAL_SPLIT", "test");
        env::set_var("QEVAL_REQUEST_TIMEOUT_SECONDS", "15");
        env::set_var("QEVAL_MAX_TASKS", "25");

        let settings = Settings::from_env();
        assert_eq!(settings.agent_endpoint, "http://10.0.0.5:9000/invoke");
        assert_eq!(settings.split, "test");
        assert_eq!(settings.request_timeout_secs, 15);
        assert_eq!(settings.max_tasks, 25);

        clear_qeval_env();
    }

    #[test]
    #[serial]
    fn unparsable_numbers_fall_back_to_defaults() {
        clear_qeval_env();
        env::set_var("QEVAL_REQUEST_TIMEOUT_SECONDS", "not-a-number");
        assert_eq!(Settings::from_env().request_timeout_secs, 120);
        clear_qeval_env();
    }
}
