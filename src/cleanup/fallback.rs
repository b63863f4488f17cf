//! Guard against erasing all content from non-empty input.

use crate::language::{contains_language, Language};
use tracing::debug;

/// Cleaned text shorter than this fraction of the original is suspect.
const MIN_RETAINED_RATIO: f64 = 0.1;

/// Outcome of checking the cleaned text against the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    /// Cleaned text is returned as is.
    Normal,
    /// Cleaning erased everything; a token of the original is returned.
    Degenerate,
}

/// Degenerate when the cleaned text is both much shorter than the original
/// and blank.
pub fn assess(original: &str, cleaned: &str) -> FallbackState {
    let original_len = original.chars().count() as f64;
    let cleaned_len = cleaned.chars().count() as f64;

    if cleaned_len < original_len * MIN_RETAINED_RATIO && cleaned.trim().is_empty() {
        FallbackState::Degenerate
    } else {
        FallbackState::Normal
    }
}

/// First token containing at least one character of `language`.
pub fn first_token_by_language<'a, I>(tokens: I, language: Language) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens
        .into_iter()
        .find(|token| contains_language(token, language))
}

/// Returns `cleaned`, or a token of `original` when cleaning was degenerate.
///
/// Allowed languages are tried in order; when no token matches any of them
/// the first token of `original` is returned unmodified.
pub fn preserve(original: &str, cleaned: String, allowed: &[Language]) -> (String, FallbackState) {
    let state = assess(original, &cleaned);
    if state == FallbackState::Normal {
        return (cleaned, state);
    }

    let token = allowed
        .iter()
        .find_map(|&language| first_token_by_language(original.split_whitespace(), language))
        .or_else(|| original.split_whitespace().next())
        .unwrap_or_default();

    debug!("Fallback engaged, keeping token {:?}", token);
    (token.to_string(), state)
}
