//! Core library for the qeval benchmark runner.
//!
//! The runner drives one agent invocation per dataset row; this crate holds
//! everything below that loop:
//! - dataset loading and task-field extraction ([`dataset`])
//! - the agent seam, the HTTP implementation behind it, and the failure
//!   taxonomy ([`agent`], [`http_agent`])
//! - interpretation of loosely-shaped agent response bodies ([`interpret`])
//! - exact-match scoring ([`score`])
//! - per-row results and the end-of-run summary ([`results`])
//! - process configuration ([`config`])

pub mod agent;
pub mod config;
pub mod dataset;
pub mod http_agent;
pub mod interpret;
pub mod results;
pub mod score;

// Re-export the types the runner touches on every row.
pub use agent::{Agent, FailureKind, InvocationOutcome};
pub use http_agent::HttpAgent;
