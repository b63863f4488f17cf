//! Short-token noise: interjections, onomatopoeia, stray jamo and looping
//! domain terms.

use super::repetition::split_words;
use crate::language::classify;
use regex::Regex;
use std::sync::LazyLock;

/// Interjections that ASR models loop on silence.
pub const REACTION_WORDS: &[&str] = &["oh", "ah", "아", "어", "오", "음", "에", "예", "네"];

/// Domain terms that loop often enough to need their own rule.
/// A space inside a term matches any amount of whitespace, including none.
pub const DOMAIN_TERMS: &[&str] = &["고추장", "고춧가루", "청양고추", "한 병"];

/// Minimum run length before a repeated token is collapsed.
const MIN_TOKEN_RUN: usize = 3;

/// Punctuation that may trail a token without changing what it is
const TRAILING_PUNCTUATION: &[char] = &[',', '.', '?', '!'];

/// Compatibility jamo, or conjoining jamo of one position (leading consonants,
/// vowels or trailing consonants) with nothing to combine with.
static RE_NONSENSE_JAMO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"[\x{3131}-\x{3163}]{2,}",
        r"|[\x{1100}-\x{115F}]{2,}",
        r"|[\x{1160}-\x{11A7}]{2,}",
        r"|[\x{11A8}-\x{11FF}]{2,}",
    ))
    .unwrap()
});

static RE_DOMAIN_TERMS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DOMAIN_TERMS
        .iter()
        .map(|term| {
            let term = term
                .split(' ')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s*");
            Regex::new(&format!(r"({term})(?:\s*{term}){{2,}}")).unwrap()
        })
        .collect()
});

/// Strips trailing `,.?!` from a token.
fn token_core(token: &str) -> &str {
    token.trim_end_matches(TRAILING_PUNCTUATION)
}

/// Collapses runs of consecutive tokens that share the same key.
///
/// `key` returns `None` for tokens the rule does not apply to. The first
/// token of a run is kept along with the whitespace after the last one.
fn collapse_token_runs<F>(text: &str, key: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let (leading, words) = split_words(text);
    if words.len() < MIN_TOKEN_RUN {
        return text.to_string();
    }

    let keys: Vec<Option<String>> = words.iter().map(|w| key(w.text)).collect();

    let mut out = String::with_capacity(text.len());
    out.push_str(leading);

    let mut i = 0;
    while i < words.len() {
        let mut end = i + 1;
        if keys[i].is_some() {
            while end < words.len() && keys[end] == keys[i] {
                end += 1;
            }
        }

        if end - i >= MIN_TOKEN_RUN {
            out.push_str(words[i].text);
            out.push_str(words[end - 1].gap);
            i = end;
        } else {
            out.push_str(words[i].text);
            out.push_str(words[i].gap);
            i += 1;
        }
    }

    out
}

/// Collapses an interjection repeated three or more times, e.g. `"아 아 아"`.
pub fn collapse_reactions(text: &str) -> String {
    collapse_token_runs(text, |token| {
        let core = token_core(token).to_lowercase();
        REACTION_WORDS.contains(&core.as_str()).then_some(core)
    })
}

/// Collapses any one- or two-letter token repeated three or more times.
pub fn collapse_onomatopoeia(text: &str) -> String {
    collapse_token_runs(text, |token| {
        let core = token_core(token);
        let len = core.chars().count();
        let is_short_word = (1..=2).contains(&len) && core.chars().all(|c| classify(c).is_some());
        is_short_word.then(|| core.to_string())
    })
}

/// Deletes runs of two or more isolated Hangul consonants or vowels, in
/// compatibility or conjoining form.
pub fn strip_nonsense_jamo(text: &str) -> String {
    RE_NONSENSE_JAMO.replace_all(text, "").into_owned()
}

/// Collapses a domain term repeated three or more times.
pub fn collapse_domain_terms(text: &str) -> String {
    let mut result = text.to_string();
    for re in RE_DOMAIN_TERMS.iter() {
        if re.is_match(&result) {
            result = re.replace_all(&result, "${1}").into_owned();
        }
    }
    result
}
