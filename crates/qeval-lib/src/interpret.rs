//! Best-effort extraction of an answer from an agent response body.
//!
//! The remote agent's response schema is not contractually fixed, so this is
//! a shape-sniffing heuristic rather than a parser for a specified format:
//! an ordered list of extraction rules tried against the body until one
//! produces text. The key lists and their priority order encode assumptions
//! about the specific agent API this runner was built against; changing
//! either changes which answers get through.

use serde_json::{Map, Value};
use tracing::debug;

/// Fallback keys looked up inside a `result` object, in priority order.
const NESTED_FALLBACK_KEYS: [&str; 6] = [
    "answer",
    "final_answer",
    "response",
    "text",
    "result",
    "content",
];

/// Fallback keys looked up at the top level of the body, in priority order.
/// Note the order differs from the nested list.
const FLAT_FALLBACK_KEYS: [&str; 6] = [
    "final_answer",
    "answer",
    "response",
    "text",
    "result",
    "content",
];

/// One step of the fallback search: a label for logging plus the lookup it
/// performs. Rules are evaluated in declaration order; the first one that
/// yields text wins.
struct ExtractionRule {
    name: &'static str,
    extract: fn(&Map<String, Value>) -> Option<String>,
}

const RULES: &[ExtractionRule] = &[
    ExtractionRule {
        name: "result.summary",
        extract: result_summary,
    },
    ExtractionRule {
        name: "result.formatted_minutes",
        extract: result_formatted_minutes,
    },
    ExtractionRule {
        name: "result fallback keys",
        extract: result_fallbacks,
    },
    ExtractionRule {
        name: "flat scalar fallback keys",
        extract: flat_fallbacks,
    },
];

/// Extracts a single textual answer from a parsed response body.
///
/// Returns the empty string when no usable answer is found: the body is not
/// an object, the API flagged an error status, or no rule matched. The
/// caller decides what an empty answer means (typically `invalid_format`).
pub fn interpret_response(body: &Value) -> String {
    let Some(map) = body.as_object() else {
        return String::new();
    };

    // An explicit non-ok status means the body carries an error payload, not
    // an answer; the invoker classifies that case before calling here.
    if !status_is_ok(map) {
        return String::new();
    }

    for rule in RULES {
        if let Some(text) = (rule.extract)(map) {
            debug!(rule = rule.name, "Extracted answer from agent response");
            return text;
        }
    }

    String::new()
}

/// A `status` field that is absent, JSON null, or the literal `"ok"` counts
/// as healthy; any other value is an API-level error signal.
pub(crate) fn status_is_ok(body: &Map<String, Value>) -> bool {
    match body.get("status") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s == "ok",
        Some(_) => false,
    }
}

fn result_summary(body: &Map<String, Value>) -> Option<String> {
    nested_value(body, "summary")
}

fn result_formatted_minutes(body: &Map<String, Value>) -> Option<String> {
    nested_value(body, "formatted_minutes")
}

fn nested_value(body: &Map<String, Value>, key: &str) -> Option<String> {
    let result = body.get("result")?.as_object()?;
    coerce(result.get(key)?)
}

/// Last-resort keys inside `result`. These intentionally do NOT reject
/// nested values, unlike the flat fallback below; the asymmetry matches the
/// agent API this was built against.
fn result_fallbacks(body: &Map<String, Value>) -> Option<String> {
    let result = body.get("result")?.as_object()?;
    NESTED_FALLBACK_KEYS
        .iter()
        .find_map(|key| coerce(result.get(*key)?))
}

/// Top-level fallback keys, scalars only: an object or array at the flat
/// level is some other structure, not an answer.
fn flat_fallbacks(body: &Map<String, Value>) -> Option<String> {
    FLAT_FALLBACK_KEYS.iter().find_map(|key| {
        let value = body.get(*key)?;
        if value.is_object() || value.is_array() {
            return None;
        }
        coerce(value)
    })
}

/// Stringifies a candidate value. Null and empty strings do not count as a
/// match, so the search continues past them.
fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
