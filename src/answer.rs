//! Answer normalization and matching.
//!
//! A guess counts only as an exact match of the canonical fourth line after
//! normalization. No partial credit, no edit distance.

/// Normalize an answer for comparison: lowercase, collapse ё to е, trim
pub fn normalize(answer: &str) -> String {
    answer.to_lowercase().replace('ё', "е").trim().to_string()
}

/// Check whether a guess matches the canonical line
pub fn check_answer(guess: &str, canonical: &str) -> bool {
    normalize(guess) == normalize(canonical)
}
