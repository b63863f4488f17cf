//! Removal of characters from languages outside the allow-set.

use crate::language::{classify, Language};

/// Removes every character whose language is not in `allowed`.
///
/// Unclassified characters (digits, punctuation, whitespace) always stay.
pub fn filter_languages(text: &str, allowed: &[Language]) -> String {
    if Language::ALL.iter().all(|l| allowed.contains(l)) {
        return text.to_string();
    }

    text.chars()
        .filter(|&c| classify(c).map_or(true, |language| allowed.contains(&language)))
        .collect()
}

/// Keeps Korean only.
pub fn filter_non_korean(text: &str) -> String {
    filter_languages(text, &[Language::Korean])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_default_languages() {
        let allowed = [Language::Korean, Language::English];
        assert_eq!(
            filter_languages("안녕 hello привет こんにちは 123!", &allowed),
            "안녕 hello   123!"
        );
    }

    #[test]
    fn test_filter_korean_only() {
        assert_eq!(filter_non_korean("오늘 meeting 시작"), "오늘  시작");
    }

    #[test]
    fn test_filter_all_allowed_is_noop() {
        let input = "안녕 hello привет 漢字";
        assert_eq!(filter_languages(input, &Language::ALL), input);
    }

    #[test]
    fn test_filter_keeps_unclassified() {
        assert_eq!(filter_non_korean("... 42 !? 🎉"), "... 42 !? 🎉");
    }

    #[test]
    fn test_filter_empty() {
        assert_eq!(filter_non_korean(""), "");
    }
}
