use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Classifies why a row could not be scored.
///
/// This is distinct from "scored but incorrect": a row carrying a failure
/// kind never reached the scorer (or could not be scored locally at all).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The network call exceeded the configured deadline.
    Timeout,
    /// The agent answered with a non-200 HTTP status.
    HttpError,
    /// The API signaled an explicit error status, or an unexpected
    /// transport/parsing error occurred.
    RuntimeError,
    /// The response body did not yield an interpretable answer.
    InvalidFormat,
    /// The dataset row has no question text; no network call is made.
    MissingQuestion,
    /// The dataset row exposes no gold answer; no network call is made.
    MissingGoldAnswer,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::HttpError => "http_error",
            FailureKind::RuntimeError => "runtime_error",
            FailureKind::InvalidFormat => "invalid_format",
            FailureKind::MissingQuestion => "missing_question",
            FailureKind::MissingGoldAnswer => "missing_gold_answer",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The terminal state of a single agent invocation.
///
/// Exactly one of `predicted_answer` (non-empty) or `failure_kind` holds
/// meaningfully; the constructors below keep that invariant.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InvocationOutcome {
    /// The interpreted answer text. Empty on failure.
    pub predicted_answer: String,
    /// Why the invocation failed, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    /// Wall-clock round-trip time of the HTTP exchange, in whole
    /// milliseconds. A timeout reports the full configured budget; failures
    /// before any response report 0.
    pub latency_ms: u64,
    /// The parsed response body, retained whenever one was decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,
}

impl InvocationOutcome {
    pub fn success(predicted_answer: String, latency_ms: u64, raw_response: Value) -> Self {
        Self {
            predicted_answer,
            failure_kind: None,
            latency_ms,
            raw_response: Some(raw_response),
        }
    }

    pub fn failure(kind: FailureKind, latency_ms: u64, raw_response: Option<Value>) -> Self {
        Self {
            predicted_answer: String::new(),
            failure_kind: Some(kind),
            latency_ms,
            raw_response,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure_kind.is_none()
    }
}

/// The seam between the run loop and whatever produces answers.
///
/// Implementations never return an error: every way an invocation can go
/// wrong is a [`FailureKind`] recorded on the outcome, so one bad row never
/// aborts a run.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn invoke(&self, question: &str) -> InvocationOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::HttpError).unwrap();
        assert_eq!(json, "\"http_error\"");
        let back: FailureKind = serde_json::from_str("\"missing_gold_answer\"").unwrap();
        assert_eq!(back, FailureKind::MissingGoldAnswer);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(FailureKind::InvalidFormat.to_string(), "invalid_format");
        assert_eq!(FailureKind::Timeout.to_string(), "timeout");
    }

    #[test]
    fn success_outcome_has_no_failure_kind() {
        let outcome =
            InvocationOutcome::success("42".to_string(), 12, serde_json::json!({"answer": "42"}));
        assert!(outcome.is_success());
        assert_eq!(outcome.predicted_answer, "42");
    }

    #[test]
    fn failure_outcome_skips_empty_fields_in_json() {
        let outcome = InvocationOutcome::failure(FailureKind::Timeout, 5000, None);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["failure_kind"], "timeout");
        assert!(json.get("raw_response").is_none());
    }
}
