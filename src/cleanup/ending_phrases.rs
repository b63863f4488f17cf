//! Sign-off, subtitle credit and URL removal.
//!
//! Models trained on subtitled video reproduce the closing lines of those
//! videos when the audio goes quiet. These are removed wherever they occur.

use regex::Regex;
use std::sync::LazyLock;

/// Catalog of ending phrases, as regex fragments.
///
/// Alternation is leftmost-first, so an entry must come before any entry that
/// is a prefix of it ("Thank you for watching" before "Thank you").
pub const ENDING_PHRASE_PATTERNS: &[&str] = &[
    // Korean
    r"시청해\s?주셔서 감사합니다\.?",
    r"다음 ?주에 만나요\.?",
    r"이 시각 세계였습니다\.?",
    r"광고를 포함하고 있습니다\.?",
    r"자막 제공 .{1,15}",
    r"한글자막 by .{1,15}",
    r"감사합니다\.?",
    // English
    r"Thank you for watching\.?",
    r"Thanks for watching\.?",
    r"Thank you\.?",
    r"Like and subscribe\.?",
    r"The end\.?",
    r"sub by .{1,15}",
    r"visit .{1,15}",
    // Japanese
    r"ご視聴ありがとうございました\.?",
    r"お疲れ様でした\.?",
    r"おやすみなさい\.?",
    r"お待ちしております\.?",
    // Chinese subtitle credits
    r"字幕提供\.?",
    r"中文字幕志愿者 .{1,15}",
    r"社群提供的字幕 .{1,15}",
    r"中文字幕 .{1,15}",
    // Other languages seen in silent segments
    r"Gracias\.?",
    r"Vielen Dank\.?",
    r"Abertura\.?",
    r"Dzień dobry\.?",
    r"Продолжение следует\.?",
    r"Субтитры сделал .{1,15}",
];

/// URL-like token: optional scheme or `www.`, a domain and a common TLD.
pub const URL_PATTERN: &str = concat!(
    r"\b(?:https?://)?(?:www\.)?[a-zA-Z0-9.-]+",
    r"\.(?:com|net|org|gov|edu|mil|co|io|tv|biz|info|onion)\b",
);

static RE_ENDING_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = ENDING_PHRASE_PATTERNS
        .iter()
        .copied()
        .chain(std::iter::once(URL_PATTERN))
        .map(|p| format!("(?:{p})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).unwrap()
});

/// Removes every catalogued ending phrase and URL-like token.
pub fn strip_ending_phrases(text: &str) -> String {
    RE_ENDING_PHRASES.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        for pattern in ENDING_PHRASE_PATTERNS {
            assert!(Regex::new(pattern).is_ok(), "bad pattern {pattern}");
        }
        assert!(RE_ENDING_PHRASES.is_match("Thank you"));
    }

    #[test]
    fn test_longest_phrase_wins() {
        assert_eq!(
            strip_ending_phrases("오늘 영상은 여기까지입니다. Thank you for watching."),
            "오늘 영상은 여기까지입니다. "
        );
    }

    #[test]
    fn test_korean_sign_off() {
        assert_eq!(strip_ending_phrases("시청해주셔서 감사합니다."), "");
        assert_eq!(strip_ending_phrases("그럼 다음주에 만나요"), "그럼 ");
    }

    #[test]
    fn test_credit_wildcard_tail() {
        assert_eq!(strip_ending_phrases("본문 한글자막 by 홍길동"), "본문 ");
        assert_eq!(strip_ending_phrases("Субтитры сделал DimaTorzok"), "");
    }

    #[test]
    fn test_phrase_anywhere() {
        assert_eq!(
            strip_ending_phrases("ご視聴ありがとうございました 그리고 계속"),
            " 그리고 계속"
        );
    }

    #[test]
    fn test_url_removal() {
        assert_eq!(
            strip_ending_phrases("자세한 건 www.example.com 참고"),
            "자세한 건  참고"
        );
        assert_eq!(strip_ending_phrases("https://youtube.com"), "");
        assert_eq!(strip_ending_phrases("go to site.io now"), "go to  now");
    }

    #[test]
    fn test_plain_text_untouched() {
        let input = "오늘은 날씨가 좋네요. The weather is nice.";
        assert_eq!(strip_ending_phrases(input), input);
    }
}
