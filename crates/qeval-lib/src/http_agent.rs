use crate::agent::{Agent, FailureKind, InvocationOutcome};
use crate::interpret::interpret_response;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// An agent reached over HTTP.
///
/// One POST per question against a fixed endpoint, with a hard per-request
/// deadline. The client is stateless across invocations; the run loop owns
/// all accumulation.
pub struct HttpAgent {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpAgent {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn timeout_outcome(&self) -> InvocationOutcome {
        // A timeout reports the configured budget, not a measurement.
        InvocationOutcome::failure(
            FailureKind::Timeout,
            self.timeout.as_millis() as u64,
            None,
        )
    }
}

/// Builds the request body the agent's invoke route expects. The task value
/// is a constant; it is never derived from the question.
pub fn build_payload(question: &str) -> Value {
    json!({
        "task": "summarize",
        "content": question,
    })
}

#[async_trait]
impl Agent for HttpAgent {
    /// Classifies the exchange into an [`InvocationOutcome`], in priority
    /// order: timeout, transport failure, non-200 status, API-level error
    /// status, uninterpretable body, success.
    #[instrument(skip(self, question), name = "agent.invoke")]
    async fn invoke(&self, question: &str) -> InvocationOutcome {
        let payload = build_payload(question);
        let started = Instant::now();

        let response = match self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(endpoint = %self.endpoint, "Agent call timed out");
                return self.timeout_outcome();
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Agent call failed before a response arrived");
                return InvocationOutcome::failure(FailureKind::RuntimeError, 0, None);
            }
        };

        // Latency is taken at response arrival, before the body is drained.
        let latency_ms = started.elapsed().as_millis() as u64;
        let status = response.status();

        if status != StatusCode::OK {
            warn!(endpoint = %self.endpoint, %status, "Agent answered with a non-200 status");
            return InvocationOutcome::failure(FailureKind::HttpError, latency_ms, None);
        }

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(e) if e.is_timeout() => {
                warn!(endpoint = %self.endpoint, "Agent call timed out while reading the body");
                return self.timeout_outcome();
            }
            Err(e) => {
                debug!(endpoint = %self.endpoint, error = %e, "Agent response body was not valid JSON");
                return InvocationOutcome::failure(FailureKind::RuntimeError, 0, None);
            }
        };

        // An explicit error status outranks any answer-shaped field in the
        // same body.
        if let Some(map) = data.as_object() {
            if !crate::interpret::status_is_ok(map) {
                warn!(endpoint = %self.endpoint, "Agent signaled an API-level error status");
                return InvocationOutcome::failure(
                    FailureKind::RuntimeError,
                    latency_ms,
                    Some(data),
                );
            }
        }

        let predicted = interpret_response(&data);
        if predicted.is_empty() {
            debug!(endpoint = %self.endpoint, "No usable answer found in agent response");
            return InvocationOutcome::failure(FailureKind::InvalidFormat, latency_ms, Some(data));
        }

        InvocationOutcome::success(predicted, latency_ms, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shape_is_fixed() {
        let payload = build_payload("What is 2+2?");
        assert_eq!(payload["task"], "summarize");
        assert_eq!(payload["content"], "What is 2+2?");
        assert_eq!(payload.as_object().unwrap().len(), 2);
    }
}
