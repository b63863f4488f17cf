//! Coarse script classification.
//!
//! Every stage that needs to know "which language is this character" goes
//! through [`classify`], so the code-point ranges live in exactly one table.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language tag assigned to a character by its Unicode range.
///
/// Characters outside every range (digits, punctuation, whitespace, symbols)
/// are unclassified, which [`classify`] reports as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Hangul syllables and jamo
    Korean,
    /// ASCII letters
    English,
    /// Hiragana, Katakana and CJK ideographs
    Japanese,
    /// Cyrillic block
    Cyrillic,
}

impl Language {
    /// Every known language, in the order the mixed-language chunker tries them.
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Korean,
        Language::Japanese,
        Language::Cyrillic,
    ];

    /// Lowercase tag name, as used in options files.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Korean => "korean",
            Language::English => "english",
            Language::Japanese => "japanese",
            Language::Cyrillic => "cyrillic",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "korean" | "ko" => Ok(Language::Korean),
            "english" | "en" => Ok(Language::English),
            "japanese" | "ja" => Ok(Language::Japanese),
            "cyrillic" | "ru" => Ok(Language::Cyrillic),
            _ => Err(Error::UnknownLanguage(s.to_string())),
        }
    }
}

/// Code-point ranges per language, sorted by start and non-overlapping.
const SCRIPT_RANGES: &[(u32, u32, Language)] = &[
    (0x0041, 0x005A, Language::English),  // A-Z
    (0x0061, 0x007A, Language::English),  // a-z
    (0x0400, 0x04FF, Language::Cyrillic), // Cyrillic
    (0x1100, 0x11FF, Language::Korean),   // Hangul Jamo
    (0x3040, 0x30FF, Language::Japanese), // Hiragana + Katakana
    (0x3131, 0x3163, Language::Korean),   // Hangul Compatibility Jamo
    (0x3400, 0x4DBF, Language::Japanese), // CJK Extension A
    (0x4E00, 0x9FFF, Language::Japanese), // CJK Unified Ideographs
    (0xAC00, 0xD7A3, Language::Korean),   // Hangul Syllables
];

/// Classify a single character. `None` means unclassified.
pub fn classify(c: char) -> Option<Language> {
    let code = c as u32;
    let idx = SCRIPT_RANGES.partition_point(|&(start, _, _)| start <= code);
    if idx == 0 {
        return None;
    }
    let (start, end, language) = SCRIPT_RANGES[idx - 1];
    (start..=end).contains(&code).then_some(language)
}

/// Check if character is a precomposed Hangul syllable block.
pub fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Check if character is an isolated Hangul consonant or vowel (ㄱ-ㅎ, ㅏ-ㅣ).
pub fn is_hangul_jamo(c: char) -> bool {
    ('\u{3131}'..='\u{3163}').contains(&c)
}

/// Returns true if any character of `text` belongs to `language`.
pub fn contains_language(text: &str, language: Language) -> bool {
    text.chars().any(|c| classify(c) == Some(language))
}
