//! Punctuation normalization.

use regex::Regex;
use std::sync::LazyLock;

static RE_PERIOD_COMMA_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s*[.,]\s*){2,}").unwrap());
static RE_LONG_ELLIPSIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{4,}").unwrap());
static RE_MULTI_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",{2,}").unwrap());
static RE_MULTI_EXCLAMATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!{3,}").unwrap());
static RE_MULTI_QUESTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?{3,}").unwrap());
static RE_SPACE_BEFORE_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,!?])").unwrap());
static RE_MARK_BEFORE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"([.,!?])([",
        r"\x{AC00}-\x{D7A3}\x{3131}-\x{3163}\x{1100}-\x{11FF}",
        r"a-zA-Z0-9",
        r"\x{3040}-\x{30FF}\x{3400}-\x{4DBF}\x{4E00}-\x{9FFF}",
        r"\x{0400}-\x{04FF}",
        r"])"
    ))
    .unwrap()
});
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

fn is_trim_char(c: char) -> bool {
    c == '.' || c == ',' || c.is_whitespace()
}

/// Trims trailing whitespace and commas, and trailing period runs that do not
/// directly follow a letter or digit. `"끝입니다. ,"` keeps its final period.
fn trim_trailing(text: &str) -> &str {
    let mut text = text;
    loop {
        text = text.trim_end_matches(|c: char| c == ',' || c.is_whitespace());
        let without_periods = text.trim_end_matches('.');
        if without_periods.len() == text.len() {
            return text;
        }
        let detached = without_periods
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        if !detached {
            return text;
        }
        text = without_periods;
    }
}

/// Collapses, caps and re-spaces punctuation.
///
/// Steps, in order:
/// 1. A run of two or more periods/commas, whitespace allowed in between,
///    becomes `...`
/// 2. Leading periods, commas and whitespace are trimmed, and so is trailing
///    punctuation that is not sentence-final
/// 3. `....` and longer become `...`; `,,` becomes `,`; `!!!` becomes `!!`;
///    `???` becomes `??`
/// 4. Whitespace before `.,!?` is removed
/// 5. A space is inserted between `.,!?` and a following letter or digit
pub fn normalize_punctuation(text: &str) -> String {
    let text = RE_PERIOD_COMMA_RUN.replace_all(text, "...");
    let text = trim_trailing(text.trim_start_matches(is_trim_char));

    let text = RE_LONG_ELLIPSIS.replace_all(text, "...");
    let text = RE_MULTI_COMMA.replace_all(&text, ",");
    let text = RE_MULTI_EXCLAMATION.replace_all(&text, "!!");
    let text = RE_MULTI_QUESTION.replace_all(&text, "??");

    let text = RE_SPACE_BEFORE_MARK.replace_all(&text, "${1}");
    RE_MARK_BEFORE_WORD
        .replace_all(&text, "${1} ${2}")
        .into_owned()
}

/// Collapses whitespace runs to one space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}
