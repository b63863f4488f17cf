//! # Cleanup Pipeline
//!
//! Stages that strip ASR hallucinations from a transcript, applied in a fixed
//! order by [`Cleaner`].
//!
//! ## Pipeline Stages
//!
//! 1. **Language filter** - drop characters of disallowed scripts
//! 2. **Stopwords** - remove catalogued filler phrases
//! 3. **Repetition** - collapse looping words and syllables
//! 4. **Single-char repeat** - collapse `"Q. Q. Q."` style runs
//! 5. **Ending phrases** - remove sign-offs, subtitle credits and URLs
//! 6. **Reactions** - collapse repeated interjections
//! 7. **Onomatopoeia** - collapse repeated short tokens
//! 8. **Nonsense jamo** - delete runs of isolated Hangul consonants/vowels
//! 9. **Mixed language** - drop short foreign fragments at language switches
//! 10. **Domain terms** - collapse looping domain vocabulary
//! 11. **Punctuation** - collapse, cap and re-space punctuation
//!
//! Whitespace is then collapsed, and the fallback check keeps one token of
//! the original when everything was erased.

mod ending_phrases;
pub mod fallback;
mod language_filter;
pub mod mixed_language;
mod punctuation;
mod repetition;
mod stopwords;
mod tokens;

pub use ending_phrases::{strip_ending_phrases, ENDING_PHRASE_PATTERNS, URL_PATTERN};
pub use fallback::FallbackState;
pub use language_filter::{filter_languages, filter_non_korean};
pub use mixed_language::clean_mixed_language;
pub use punctuation::{collapse_whitespace, normalize_punctuation};
pub use repetition::{
    collapse_any_tight_repeat, collapse_repetitions, collapse_single_char_repeats,
    collapse_tight_syllables, collapse_word_groups,
};
pub use stopwords::{compile_stopwords, compile_stopwords_lenient, strip_stopwords, Stopword};
pub use tokens::{
    collapse_domain_terms, collapse_onomatopoeia, collapse_reactions, strip_nonsense_jamo,
    DOMAIN_TERMS, REACTION_WORDS,
};

use crate::error::Result;
use crate::language::Language;
use crate::options::{CleanOptions, DEFAULT_ALLOWED_LANGUAGES};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// A single cleaning stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    LanguageFilter,
    Stopwords,
    Repetition,
    SingleCharRepeat,
    EndingPhrases,
    Reactions,
    Onomatopoeia,
    NonsenseJamo,
    MixedLanguage,
    DomainTerms,
    Punctuation,
}

impl Stage {
    /// Every stage, in the fixed pipeline order.
    pub const ALL: [Stage; 11] = [
        Stage::LanguageFilter,
        Stage::Stopwords,
        Stage::Repetition,
        Stage::SingleCharRepeat,
        Stage::EndingPhrases,
        Stage::Reactions,
        Stage::Onomatopoeia,
        Stage::NonsenseJamo,
        Stage::MixedLanguage,
        Stage::DomainTerms,
        Stage::Punctuation,
    ];

    /// Stable snake_case name, as used in options files and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::LanguageFilter => "language_filter",
            Stage::Stopwords => "stopwords",
            Stage::Repetition => "repetition",
            Stage::SingleCharRepeat => "single_char_repeat",
            Stage::EndingPhrases => "ending_phrases",
            Stage::Reactions => "reactions",
            Stage::Onomatopoeia => "onomatopoeia",
            Stage::NonsenseJamo => "nonsense_jamo",
            Stage::MixedLanguage => "mixed_language",
            Stage::DomainTerms => "domain_terms",
            Stage::Punctuation => "punctuation",
        }
    }

    /// Applies this stage alone, with the configuration of `cleaner`.
    pub fn apply(&self, text: &str, cleaner: &Cleaner) -> String {
        match self {
            Stage::LanguageFilter => filter_languages(text, cleaner.allowed_languages()),
            Stage::Stopwords => strip_stopwords(text, &cleaner.stopwords),
            Stage::Repetition => collapse_repetitions(text),
            Stage::SingleCharRepeat => collapse_single_char_repeats(text),
            Stage::EndingPhrases => strip_ending_phrases(text),
            Stage::Reactions => collapse_reactions(text),
            Stage::Onomatopoeia => collapse_onomatopoeia(text),
            Stage::NonsenseJamo => strip_nonsense_jamo(text),
            Stage::MixedLanguage => clean_mixed_language(text, cleaner.allowed_languages()),
            Stage::DomainTerms => collapse_domain_terms(text),
            Stage::Punctuation => normalize_punctuation(text),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stage that changed the text, with character counts around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageChange {
    pub stage: Stage,
    pub chars_before: usize,
    pub chars_after: usize,
}

/// Result of [`Cleaner::clean_with_report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    /// The cleaned text, identical to what [`Cleaner::clean`] returns.
    pub text: String,
    /// Stages that changed the text, in execution order.
    pub stages: Vec<StageChange>,
    /// True when the fallback replaced an erased result with a token of the input.
    pub fallback_used: bool,
    /// True when NFC composition changed the input before the first stage.
    pub unicode_normalized: bool,
}

/// What one run of the pipeline produced.
struct Outcome {
    text: String,
    fallback: FallbackState,
    normalized: bool,
}

/// Transcript cleaner with its stopword matchers compiled once.
///
/// Cleaning never fails and never mutates the cleaner, so one instance can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct Cleaner {
    options: CleanOptions,
    stopwords: Vec<Stopword>,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::lenient(CleanOptions::default())
    }
}

impl Cleaner {
    /// Builds a cleaner, failing if a stopword cannot be compiled.
    pub fn new(options: CleanOptions) -> Result<Self> {
        let stopwords = compile_stopwords(&options.stopwords)?;
        Ok(Self { options, stopwords })
    }

    /// Builds a cleaner, skipping stopwords that cannot be compiled.
    pub fn lenient(options: CleanOptions) -> Self {
        let stopwords = compile_stopwords_lenient(&options.stopwords);
        Self { options, stopwords }
    }

    pub fn options(&self) -> &CleanOptions {
        &self.options
    }

    /// The allow-set in priority order; an empty list means the defaults.
    pub fn allowed_languages(&self) -> &[Language] {
        if self.options.allowed_languages.is_empty() {
            DEFAULT_ALLOWED_LANGUAGES
        } else {
            &self.options.allowed_languages
        }
    }

    /// Cleans one transcript.
    pub fn clean(&self, text: &str) -> String {
        self.run(text, None).text
    }

    /// Cleans one transcript and records which stages changed it.
    pub fn clean_with_report(&self, text: &str) -> CleanReport {
        let mut stages = Vec::new();
        let outcome = self.run(text, Some(&mut stages));
        CleanReport {
            text: outcome.text,
            stages,
            fallback_used: outcome.fallback == FallbackState::Degenerate,
            unicode_normalized: outcome.normalized,
        }
    }

    /// Cleans many transcripts in parallel. Output order matches input order.
    pub fn clean_batch<S>(&self, texts: &[S]) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|t| self.clean(t.as_ref())).collect()
    }

    fn run(&self, input: &str, mut changes: Option<&mut Vec<StageChange>>) -> Outcome {
        if input.trim().is_empty() {
            return Outcome {
                text: input.to_string(),
                fallback: FallbackState::Normal,
                normalized: false,
            };
        }

        let mut result = if self.options.normalize_unicode {
            input.nfc().collect::<String>()
        } else {
            input.to_string()
        };
        let normalized = result != input;
        if normalized {
            debug!(
                "NFC: {} chars to {} chars",
                input.chars().count(),
                result.chars().count()
            );
        }

        for stage in &self.options.stages {
            let next = stage.apply(&result, self);
            if next != result {
                let chars_before = result.chars().count();
                let chars_after = next.chars().count();
                debug!("Stage {}: {} chars to {} chars", stage, chars_before, chars_after);
                if let Some(changes) = changes.as_deref_mut() {
                    changes.push(StageChange {
                        stage: *stage,
                        chars_before,
                        chars_after,
                    });
                }
                result = next;
            }
        }

        // The fallback token is taken verbatim from the caller's input
        let result = collapse_whitespace(&result);
        let (text, fallback) = fallback::preserve(input, result, self.allowed_languages());
        Outcome {
            text,
            fallback,
            normalized,
        }
    }
}

/// Cleans `text` with `options`. Stopwords that cannot be compiled are skipped.
pub fn clean(text: &str, options: &CleanOptions) -> String {
    Cleaner::lenient(options.clone()).clean(text)
}

/// Cleans `text` with default options.
pub fn clean_default(text: &str) -> String {
    Cleaner::default().clean(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_match_serde() {
        for stage in Stage::ALL {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.name()));
            let back: Stage = serde_json::from_str(&json).unwrap();
            assert_eq!(back, stage);
        }
    }

    #[test]
    fn test_fixed_order() {
        assert_eq!(Stage::ALL.first(), Some(&Stage::LanguageFilter));
        assert_eq!(Stage::ALL.last(), Some(&Stage::Punctuation));
        let mixed = Stage::ALL.iter().position(|s| *s == Stage::MixedLanguage);
        let jamo = Stage::ALL.iter().position(|s| *s == Stage::NonsenseJamo);
        assert!(jamo < mixed);
    }

    #[test]
    fn test_word_group_example() {
        assert_eq!(clean_default("very good very good very good"), "very good");
    }

    #[test]
    fn test_tight_syllable_example() {
        assert_eq!(clean_default("고추장고추장고추장"), "고추장");
    }

    #[test]
    fn test_ending_phrase_example() {
        assert_eq!(
            clean_default("오늘 영상은 여기까지입니다. Thank you for watching."),
            "오늘 영상은 여기까지입니다."
        );
    }

    #[test]
    fn test_reaction_example() {
        assert_eq!(clean_default("아 아 아 아"), "아");
    }

    #[test]
    fn test_fallback_example() {
        assert_eq!(clean_default("ㅋㅋㅋ"), "ㅋㅋㅋ");
    }

    #[test]
    fn test_empty_and_whitespace_passthrough() {
        assert_eq!(clean_default(""), "");
        assert_eq!(clean_default("   "), "   ");
        assert_eq!(clean_default("\n\t "), "\n\t ");
    }

    #[test]
    fn test_disallowed_script_removed() {
        assert_eq!(clean_default("안녕하세요 привет こんにちは"), "안녕하세요");
    }

    #[test]
    fn test_default_stopwords() {
        assert_eq!(clean_default("시청자 여러분 안녕하세요"), "안녕하세요");
        assert_eq!(clean_default("oh, 정말요"), "정말요");
    }

    #[test]
    fn test_custom_stopwords() {
        let options = CleanOptions::default().with_stopwords(["구독과 좋아요"]);
        assert_eq!(clean("구독과 좋아요 부탁드려요", &options), "부탁드려요");
    }

    #[test]
    fn test_korean_only() {
        let options = CleanOptions::korean_only();
        assert_eq!(
            clean("오늘 meeting 시작합니다", &options),
            "오늘 시작합니다"
        );
    }

    #[test]
    fn test_fallback_language_priority() {
        let options = CleanOptions::korean_only();
        // Everything but Hangul is removed, then the sign-off goes too
        let text = "hello 감사합니다";
        assert_eq!(clean(text, &options), "감사합니다");
    }

    #[test]
    fn test_minimal_preset_skips_repetition() {
        let options = CleanOptions::minimal();
        assert_eq!(clean("네 네 네 네", &options), "네 네 네 네");
    }

    #[test]
    fn test_nfc_composition() {
        // "한" as conjoining jamo
        let decomposed = "\u{1112}\u{1161}\u{11AB}".repeat(4);
        assert_eq!(clean_default(&decomposed), "한한");
    }

    #[test]
    fn test_report_marks_normalization() {
        let report = Cleaner::default().clean_with_report(&"e\u{0301}".repeat(3));
        assert_eq!(report.text, "\u{e9}\u{e9}\u{e9}");
        assert!(report.unicode_normalized);
        assert!(report.stages.is_empty());
        assert!(!report.fallback_used);

        let report = Cleaner::default().clean_with_report("고추장고추장고추장");
        assert!(!report.unicode_normalized);
    }

    #[test]
    fn test_fallback_token_is_raw_input() {
        let options = CleanOptions::default().with_allowed_languages([Language::English]);
        let decomposed = "\u{1100}\u{1161}";
        let report = Cleaner::lenient(options).clean_with_report(decomposed);
        assert!(report.fallback_used);
        assert!(report.unicode_normalized);
        assert_eq!(report.text, decomposed);
    }

    #[test]
    fn test_lone_conjoining_jamo_falls_back() {
        let options = CleanOptions::default().without_unicode_normalization();
        let jamo = "\u{110F}\u{110F}\u{110F}";
        let report = Cleaner::lenient(options).clean_with_report(jamo);
        assert_eq!(report.text, jamo);
        assert!(report.fallback_used);
        assert_eq!(report.stages[0].stage, Stage::NonsenseJamo);
    }

    #[test]
    fn test_report() {
        let cleaner = Cleaner::new(CleanOptions::default()).unwrap();
        let report = cleaner.clean_with_report("아 아 아 아");
        assert_eq!(report.text, "아");
        assert!(!report.fallback_used);
        assert_eq!(report.stages.len(), 1);
        assert_eq!(report.stages[0].stage, Stage::Repetition);
        assert_eq!(report.stages[0].chars_before, 7);
        assert_eq!(report.stages[0].chars_after, 1);
    }

    #[test]
    fn test_report_fallback() {
        let report = Cleaner::default().clean_with_report("ㅋㅋㅋ");
        assert_eq!(report.text, "ㅋㅋㅋ");
        assert!(report.fallback_used);
        assert_eq!(report.stages[0].stage, Stage::NonsenseJamo);
    }

    #[test]
    fn test_report_serializes() {
        let report = Cleaner::default().clean_with_report("고추장고추장고추장");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["text"], "고추장");
        assert_eq!(json["stages"][0]["stage"], "repetition");
        assert_eq!(json["fallback_used"], false);
        assert_eq!(json["unicode_normalized"], false);
    }

    #[test]
    fn test_clean_batch_keeps_order() {
        let cleaner = Cleaner::default();
        let inputs = vec!["아 아 아 아", "", "고추장고추장고추장", "ㅋㅋㅋ"];
        assert_eq!(
            cleaner.clean_batch(&inputs),
            vec!["아", "", "고추장", "ㅋㅋㅋ"]
        );
    }

    #[test]
    fn test_strict_and_lenient_agree() {
        let options = CleanOptions::default().add_stopwords(["(괄호)"]);
        let strict = Cleaner::new(options.clone()).unwrap();
        let lenient = Cleaner::lenient(options);
        let text = "(괄호) 본문입니다";
        assert_eq!(strict.clean(text), lenient.clean(text));
        assert_eq!(strict.clean(text), "본문입니다");
    }

    #[test]
    fn test_stage_apply_in_isolation() {
        let cleaner = Cleaner::default();
        assert_eq!(Stage::Repetition.apply("하하하하하하", &cleaner), "하하");
        assert_eq!(
            Stage::LanguageFilter.apply("안녕 привет", &cleaner),
            "안녕 "
        );
    }

    #[test]
    fn test_cleaner_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Cleaner>();
    }
}
