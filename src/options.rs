//! Options for transcript cleaning.

use crate::cleanup::Stage;
use crate::error::Result;
use crate::language::Language;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Phrases removed by default: filler that ASR models emit on silence.
pub const DEFAULT_STOPWORDS: &[&str] = &["はい", "ㅎ", "핳", "Oh,", "good.", "시청자 여러분"];

/// Languages kept by default, in fallback priority order.
pub const DEFAULT_ALLOWED_LANGUAGES: &[Language] = &[Language::Korean, Language::English];

/// Options for controlling transcript cleaning.
///
/// Immutable once handed to a [`Cleaner`](crate::Cleaner); one instance can
/// serve any number of concurrent cleaning calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// Languages to keep. The order is the fallback priority: the first
    /// listed language wins when a single token has to be preserved.
    #[serde(deserialize_with = "deserialize_languages")]
    pub allowed_languages: Vec<Language>,

    /// Literal phrases removed case-insensitively, in order.
    pub stopwords: Vec<String>,

    /// Whether to compose the input to Unicode NFC before the first stage.
    pub normalize_unicode: bool,

    /// Stages to run, in execution order.
    pub stages: Vec<Stage>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            allowed_languages: DEFAULT_ALLOWED_LANGUAGES.to_vec(),
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            normalize_unicode: true,
            stages: Stage::ALL.to_vec(),
        }
    }
}

impl CleanOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for minimal cleaning (language filter, stopwords, punctuation)
    pub fn minimal() -> Self {
        Self {
            stages: vec![Stage::LanguageFilter, Stage::Stopwords, Stage::Punctuation],
            ..Self::default()
        }
    }

    /// Creates options that keep Korean only
    pub fn korean_only() -> Self {
        Self::default().with_allowed_languages([Language::Korean])
    }

    /// Sets the allowed languages. An empty list keeps the defaults.
    pub fn with_allowed_languages(
        mut self,
        languages: impl IntoIterator<Item = Language>,
    ) -> Self {
        let mut allowed: Vec<Language> = Vec::new();
        for language in languages {
            if !allowed.contains(&language) {
                allowed.push(language);
            }
        }
        if !allowed.is_empty() {
            self.allowed_languages = allowed;
        }
        self
    }

    /// Replaces the stopword catalog.
    pub fn with_stopwords<S: Into<String>>(
        mut self,
        stopwords: impl IntoIterator<Item = S>,
    ) -> Self {
        self.stopwords = stopwords.into_iter().map(Into::into).collect();
        self
    }

    /// Appends phrases to the stopword catalog.
    pub fn add_stopwords<S: Into<String>>(
        mut self,
        stopwords: impl IntoIterator<Item = S>,
    ) -> Self {
        self.stopwords.extend(stopwords.into_iter().map(Into::into));
        self
    }

    /// Disables stopword removal.
    pub fn without_stopwords(mut self) -> Self {
        self.stopwords.clear();
        self
    }

    /// Sets the stages to run, in order.
    pub fn with_stages(mut self, stages: impl IntoIterator<Item = Stage>) -> Self {
        self.stages = stages.into_iter().collect();
        self
    }

    /// Removes one stage from the run list.
    pub fn without_stage(mut self, stage: Stage) -> Self {
        self.stages.retain(|s| *s != stage);
        self
    }

    /// Disables NFC composition of the input.
    pub fn without_unicode_normalization(mut self) -> Self {
        self.normalize_unicode = false;
        self
    }

    /// Returns true if `language` is in the allow-set.
    pub fn is_allowed(&self, language: Language) -> bool {
        self.allowed_languages.contains(&language)
    }

    /// Parses options from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Unknown language names are inert: they are logged and dropped.
fn deserialize_languages<'de, D>(deserializer: D) -> std::result::Result<Vec<Language>, D::Error>
where
    D: Deserializer<'de>,
{
    let names: Vec<String> = Vec::deserialize(deserializer)?;
    let mut languages = Vec::with_capacity(names.len());
    for name in &names {
        match name.parse::<Language>() {
            Ok(language) if !languages.contains(&language) => languages.push(language),
            Ok(_) => {}
            Err(_) => tracing::warn!("Ignoring unknown language {:?} in options", name),
        }
    }
    if languages.is_empty() {
        languages = DEFAULT_ALLOWED_LANGUAGES.to_vec();
    }
    Ok(languages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_options() {
        let options = CleanOptions::default();
        assert_eq!(
            options.allowed_languages,
            vec![Language::Korean, Language::English]
        );
        assert_eq!(options.stopwords.len(), DEFAULT_STOPWORDS.len());
        assert!(options.normalize_unicode);
        assert_eq!(options.stages, Stage::ALL.to_vec());
    }

    #[test]
    fn test_minimal_preset() {
        let options = CleanOptions::minimal();
        assert_eq!(options.stages.len(), 3);
        assert_eq!(options.stages.last(), Some(&Stage::Punctuation));
    }

    #[test]
    fn test_korean_only_preset() {
        let options = CleanOptions::korean_only();
        assert_eq!(options.allowed_languages, vec![Language::Korean]);
        assert!(!options.is_allowed(Language::English));
    }

    #[test]
    fn test_empty_languages_keep_defaults() {
        let options = CleanOptions::default().with_allowed_languages(Vec::new());
        assert_eq!(
            options.allowed_languages,
            DEFAULT_ALLOWED_LANGUAGES.to_vec()
        );
    }

    #[test]
    fn test_duplicate_languages_removed() {
        let options = CleanOptions::default().with_allowed_languages([
            Language::English,
            Language::Korean,
            Language::English,
        ]);
        assert_eq!(
            options.allowed_languages,
            vec![Language::English, Language::Korean]
        );
    }

    #[test]
    fn test_stopword_builders() {
        let options = CleanOptions::default()
            .without_stopwords()
            .add_stopwords(["구독", "좋아요"]);
        assert_eq!(options.stopwords, vec!["구독", "좋아요"]);

        let replaced = CleanOptions::default().with_stopwords(vec!["x".to_string()]);
        assert_eq!(replaced.stopwords, vec!["x"]);
    }

    #[test]
    fn test_without_stage() {
        let options = CleanOptions::default().without_stage(Stage::MixedLanguage);
        assert!(!options.stages.contains(&Stage::MixedLanguage));
        assert_eq!(options.stages.len(), Stage::ALL.len() - 1);
    }

    #[test]
    fn test_from_json_partial() {
        let options =
            CleanOptions::from_json_str(r#"{"allowed_languages": ["english", "japanese"]}"#)
                .unwrap();
        assert_eq!(
            options.allowed_languages,
            vec![Language::English, Language::Japanese]
        );
        // Omitted fields fall back to defaults
        assert_eq!(options.stopwords.len(), DEFAULT_STOPWORDS.len());
        assert_eq!(options.stages, Stage::ALL.to_vec());
    }

    #[test]
    fn test_from_json_unknown_language_is_inert() {
        let options =
            CleanOptions::from_json_str(r#"{"allowed_languages": ["korean", "klingon"]}"#)
                .unwrap();
        assert_eq!(options.allowed_languages, vec![Language::Korean]);

        let only_unknown =
            CleanOptions::from_json_str(r#"{"allowed_languages": ["klingon"]}"#).unwrap();
        assert_eq!(
            only_unknown.allowed_languages,
            DEFAULT_ALLOWED_LANGUAGES.to_vec()
        );
    }

    #[test]
    fn test_from_json_stages_and_stopwords() {
        let json = r#"{
            "stopwords": [],
            "stages": ["language_filter", "punctuation"],
            "normalize_unicode": false
        }"#;
        let options = CleanOptions::from_json_str(json).unwrap();
        assert!(options.stopwords.is_empty());
        assert_eq!(
            options.stages,
            vec![Stage::LanguageFilter, Stage::Punctuation]
        );
        assert!(!options.normalize_unicode);
    }

    #[test]
    fn test_from_json_invalid() {
        let result = CleanOptions::from_json_str("{ not json");
        assert!(matches!(result, Err(crate::Error::Json(_))));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"allowed_languages": ["korean"], "stopwords": ["음"]}}"#).unwrap();

        let options = CleanOptions::from_json_file(file.path()).unwrap();
        assert_eq!(options.allowed_languages, vec![Language::Korean]);
        assert_eq!(options.stopwords, vec!["음"]);
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = CleanOptions::from_json_file("/nonexistent/unhallu/options.json");
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }

    #[test]
    fn test_json_roundtrip_names() {
        let json = serde_json::to_string(&CleanOptions::korean_only()).unwrap();
        assert!(json.contains("\"korean\""));
        assert!(json.contains("\"mixed_language\""));
    }
}
