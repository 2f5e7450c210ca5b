//! Token estimation
//!
//! A characters/4 heuristic; good enough for "tokens saved" statistics.

/// Estimate the token count of a text: `max(1, ceil(chars / 4))`.
pub fn estimate_tokens(text: &str) -> usize {
    let chars = text.chars().count();
    chars.div_ceil(4).max(1)
}

/// Tokens saved by cleaning. Monotonic: never negative, even when
/// normalization reorders whitespace in the estimator's favor.
pub fn saved_tokens(original: &str, cleaned: &str) -> usize {
    estimate_tokens(original).saturating_sub(estimate_tokens(cleaned))
}
