//! Repetition collapsing.
//!
//! ASR models loop in two ways: whole words ("very good very good very good")
//! and syllables glued together without spaces ("고추장고추장고추장"). Word
//! boundaries do not exist in the second case, so each shape gets its own pass.

use crate::language::is_hangul_syllable;

/// Largest word group checked by the word-level pass.
pub const MAX_WORD_GROUP: usize = 6;

/// Syllable unit lengths checked by the fixed-length tight pass.
const TIGHT_UNIT_LENGTHS: std::ops::RangeInclusive<usize> = 2..=6;

/// A whitespace-delimited word together with the whitespace after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Word<'a> {
    pub text: &'a str,
    pub gap: &'a str,
}

/// Splits text into leading whitespace and words with their trailing gaps.
///
/// Concatenating the leading whitespace and every `text + gap` reproduces
/// the input exactly.
pub(crate) fn split_words(text: &str) -> (&str, Vec<Word<'_>>) {
    let body = text.trim_start();
    let leading = &text[..text.len() - body.len()];

    let mut words = Vec::new();
    let mut rest = body;
    while !rest.is_empty() {
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (word, after) = rest.split_at(word_end);
        let gap_end = after
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(after.len());
        let (gap, next) = after.split_at(gap_end);
        words.push(Word { text: word, gap });
        rest = next;
    }

    (leading, words)
}

/// Collapses every repetition shape, word groups first.
pub fn collapse_repetitions(text: &str) -> String {
    let mut result = text.to_string();

    for size in 1..=MAX_WORD_GROUP {
        result = collapse_word_groups(&result, size);
    }

    for unit in TIGHT_UNIT_LENGTHS {
        result = collapse_tight_syllables(&result, unit);
    }

    collapse_any_tight_repeat(&result)
}

/// Collapses a group of `size` words followed by two or more copies of itself.
///
/// The separators inside the kept group are preserved; the whitespace after
/// the whole run is kept so the following word does not get glued on.
pub fn collapse_word_groups(text: &str, size: usize) -> String {
    if size == 0 {
        return text.to_string();
    }

    let (leading, words) = split_words(text);
    if words.len() < size * 3 {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    out.push_str(leading);

    let mut i = 0;
    while i < words.len() {
        let occurrences = count_group_occurrences(&words, i, size);
        if occurrences >= 3 {
            let group = &words[i..i + size];
            for (k, word) in group.iter().enumerate() {
                out.push_str(word.text);
                if k + 1 < size {
                    out.push_str(word.gap);
                }
            }
            out.push_str(words[i + occurrences * size - 1].gap);
            i += occurrences * size;
        } else {
            out.push_str(words[i].text);
            out.push_str(words[i].gap);
            i += 1;
        }
    }

    out
}

/// Number of back-to-back copies of `words[start..start + size]`, counting itself.
fn count_group_occurrences(words: &[Word<'_>], start: usize, size: usize) -> usize {
    if start + size > words.len() {
        return 0;
    }

    let mut count = 1;
    while start + (count + 1) * size <= words.len()
        && (0..size).all(|k| words[start + k].text == words[start + count * size + k].text)
    {
        count += 1;
    }
    count
}

/// A tight repeat found while scanning characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RepeatMatch {
    start: usize,
    unit_len: usize,
    count: usize,
}

impl RepeatMatch {
    fn end(&self) -> usize {
        self.start + self.unit_len * self.count
    }
}

/// Counts back-to-back copies of `chars[start..start + unit_len]`, counting itself.
fn count_copies(chars: &[char], start: usize, unit_len: usize) -> usize {
    let unit = &chars[start..start + unit_len];
    let mut count = 1;
    while chars
        .get(start + count * unit_len..start + (count + 1) * unit_len)
        .is_some_and(|next| next == unit)
    {
        count += 1;
    }
    count
}

/// Counts back-to-back copies of the syllable unit at `chars[start..start + unit_len]`.
fn tight_repeat_at(chars: &[char], start: usize, unit_len: usize) -> Option<RepeatMatch> {
    let unit = chars.get(start..start + unit_len)?;
    if !unit.iter().all(|&c| is_hangul_syllable(c)) {
        return None;
    }

    Some(RepeatMatch {
        start,
        unit_len,
        count: count_copies(chars, start, unit_len),
    })
}

/// Collapses a tight run of `unit_len` syllables repeated three or more times.
pub fn collapse_tight_syllables(text: &str, unit_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if unit_len == 0 || chars.len() < unit_len * 3 {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        match tight_repeat_at(&chars, i, unit_len) {
            Some(m) if m.count >= 3 => {
                out.extend(&chars[m.start..m.start + m.unit_len]);
                i = m.end();
            }
            _ => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }

    out
}

/// Collapses any tight syllable unit of length two or more that repeats at least once.
///
/// The longest unit that repeats at a position wins.
pub fn collapse_any_tight_repeat(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    let mut i = 0;
    let mut run_end = 0;
    while i < chars.len() {
        if i >= run_end {
            run_end = i + chars[i..]
                .iter()
                .take_while(|&&c| is_hangul_syllable(c))
                .count();
        }

        // Copies stay inside the Hangul run, so only the run is searched
        let run = &chars[i..run_end];
        let found = (2..=run.len() / 2)
            .rev()
            .filter(|&unit_len| run[unit_len] == run[0])
            .map(|unit_len| RepeatMatch {
                start: i,
                unit_len,
                count: count_copies(run, 0, unit_len),
            })
            .find(|m| m.count >= 2);

        match found {
            Some(m) => {
                out.extend(&chars[m.start..m.start + m.unit_len]);
                i = m.end();
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }

    out
}

/// Check if character counts as a word character for single-character detection
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A lone word character plus the non-word run after it, e.g. `"Q. "`.
///
/// Returns the end index and the punctuation with whitespace removed.
fn single_char_unit(chars: &[char], i: usize) -> Option<(usize, String)> {
    let c = *chars.get(i)?;
    if !is_word_char(c) {
        return None;
    }
    if i > 0 && is_word_char(chars[i - 1]) {
        return None;
    }
    if chars.get(i + 1).is_some_and(|&next| is_word_char(next)) {
        return None;
    }

    let mut end = i + 1;
    while end < chars.len() && !is_word_char(chars[end]) {
        end += 1;
    }
    let punct = chars[i + 1..end]
        .iter()
        .filter(|c| !c.is_whitespace())
        .collect();
    Some((end, punct))
}

/// Collapses a lone character (with optional punctuation) repeated three or
/// more times, e.g. `"Q. Q. Q. Q."`, to one copy followed by a space.
pub fn collapse_single_char_repeats(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        if let Some((mut end, punct)) = single_char_unit(&chars, i) {
            let mut count = 1;
            while let Some((next_end, next_punct)) = single_char_unit(&chars, end) {
                if chars[end] != chars[i] || next_punct != punct {
                    break;
                }
                count += 1;
                end = next_end;
            }

            if count >= 3 {
                out.push(chars[i]);
                out.push_str(&punct);
                out.push(' ');
                i = end;
                continue;
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}
