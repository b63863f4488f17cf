//! Mixed-language fragment removal.
//!
//! Text is cut into language-homogeneous chunks in one forward pass; a second
//! pass drops short disallowed-language chunks that sit between chunks of a
//! different language. A lone foreign word wedged into a language switch is
//! usually mistranscribed noise, while longer or stable foreign content is
//! presumed genuine.

use crate::language::{classify, Language};

/// Punctuation that travels with the letters of any language.
pub const CHUNK_PUNCTUATION: &[char] = &['\'', '"', '.', '!', '?', ',', ':', ';', '(', ')'];

/// A candidate chunk has at most this many words...
const MAX_CANDIDATE_WORDS: usize = 2;

/// ...and fewer than this many characters.
const MAX_CANDIDATE_CHARS: usize = 10;

/// A maximal span of one language, or boundary filler between spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Language of the span; `None` for filler (whitespace, digits, symbols).
    pub language: Option<Language>,
    /// The literal text of the span.
    pub text: &'a str,
    /// Disallowed language, short, and therefore eligible for removal.
    pub filter_candidate: bool,
}

impl<'a> Chunk<'a> {
    fn filler(text: &'a str) -> Self {
        Self {
            language: None,
            text,
            filter_candidate: false,
        }
    }
}

fn in_class(c: char, language: Language) -> bool {
    classify(c) == Some(language) || CHUNK_PUNCTUATION.contains(&c)
}

/// Matches `class+ (\s+ class+)*` at `start`.
///
/// Returns the end index and whether the run holds at least one letter of
/// `language` (a punctuation-only run is not a language span).
fn match_run(chars: &[(usize, char)], start: usize, language: Language) -> (usize, bool) {
    let mut end = start;
    let mut has_letter = false;
    let mut i = start;

    loop {
        let mut j = i;
        while j < chars.len() && in_class(chars[j].1, language) {
            has_letter |= classify(chars[j].1) == Some(language);
            j += 1;
        }
        if j == i {
            break;
        }
        end = j;

        let mut k = j;
        while k < chars.len() && chars[k].1.is_whitespace() {
            k += 1;
        }
        if k == j || k == chars.len() || !in_class(chars[k].1, language) {
            break;
        }
        i = k;
    }

    (end, has_letter)
}

/// Pass 1: cuts `text` into chunks, longest language run first.
///
/// Ties go to the language listed first in [`Language::ALL`]. Characters no
/// language run can start with, and runs of punctuation alone, become filler.
pub fn segment<'a>(text: &'a str, allowed: &[Language]) -> Vec<Chunk<'a>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |idx: usize| chars.get(idx).map_or(text.len(), |&(b, _)| b);

    let mut chunks = Vec::new();
    let mut filler_start: Option<usize> = None;
    let mut i = 0;

    while i < chars.len() {
        let mut best: Option<(usize, Language)> = None;
        let mut letterless_end = i + 1;
        for language in Language::ALL {
            let (end, has_letter) = match_run(&chars, i, language);
            if has_letter {
                if best.map_or(true, |(best_end, _)| end > best_end) {
                    best = Some((end, language));
                }
            } else {
                letterless_end = letterless_end.max(end);
            }
        }

        match best {
            Some((end, language)) => {
                if let Some(start) = filler_start.take() {
                    chunks.push(Chunk::filler(&text[byte_at(start)..byte_at(i)]));
                }
                let span = &text[byte_at(i)..byte_at(end)];
                let filter_candidate = !allowed.contains(&language)
                    && span.split_whitespace().count() <= MAX_CANDIDATE_WORDS
                    && span.chars().count() < MAX_CANDIDATE_CHARS;
                chunks.push(Chunk {
                    language: Some(language),
                    text: span,
                    filter_candidate,
                });
                i = end;
            }
            None => {
                // Every suffix of a letterless run is letterless too
                filler_start.get_or_insert(i);
                i = letterless_end;
            }
        }
    }

    if let Some(start) = filler_start {
        chunks.push(Chunk::filler(&text[byte_at(start)..]));
    }

    chunks
}

/// Pass 2: drops candidates whose nearest language-tagged neighbours on both
/// sides are in a different language, and joins the rest.
pub fn drop_transition_fragments(chunks: &[Chunk<'_>]) -> String {
    let mut out = String::new();

    for (i, chunk) in chunks.iter().enumerate() {
        if chunk.filter_candidate {
            let prev = chunks[..i].iter().rev().find_map(|c| c.language);
            let next = chunks[i + 1..].iter().find_map(|c| c.language);
            let at_transition = matches!(
                (prev, next),
                (Some(p), Some(n)) if Some(p) != chunk.language && Some(n) != chunk.language
            );
            if at_transition {
                continue;
            }
        }
        out.push_str(chunk.text);
    }

    out
}

/// Removes short foreign fragments at language transitions.
/// No-op when only one language is allowed.
pub fn clean_mixed_language(text: &str, allowed: &[Language]) -> String {
    if allowed.len() <= 1 {
        return text.to_string();
    }
    drop_transition_fragments(&segment(text, allowed))
}
