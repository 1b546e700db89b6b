//! Exact-match scoring over normalized answer text.

/// Canonicalizes answer text for comparison: trims, lowercases, and collapses
/// every run of whitespace to a single space. Idempotent.
pub fn normalize_text(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns true iff the two strings are identical after normalization.
///
/// This is deliberately strict: "Paris, France" does not match "paris".
/// A row that fails here is recorded as scored-but-incorrect, not as a
/// failure kind.
pub fn exact_match_score(predicted: &str, gold: &str) -> bool {
    normalize_text(predicted) == normalize_text(gold)
}
