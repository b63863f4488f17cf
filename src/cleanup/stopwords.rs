//! Literal stopword removal.

use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};

/// A stopword phrase compiled into a case-insensitive literal matcher.
#[derive(Debug, Clone)]
pub struct Stopword {
    matcher: Regex,
}

impl Stopword {
    /// Compiles `phrase`. Regex metacharacters in it are matched literally.
    pub fn new(phrase: &str) -> Result<Self> {
        let matcher = RegexBuilder::new(&regex::escape(phrase))
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::InvalidStopword {
                phrase: phrase.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { matcher })
    }

    /// Removes every occurrence of the phrase.
    pub fn strip(&self, text: &str) -> String {
        self.matcher.replace_all(text, "").into_owned()
    }
}

/// Compiles a stopword catalog, failing on the first bad phrase.
/// Empty phrases are skipped.
pub fn compile_stopwords<S: AsRef<str>>(phrases: &[S]) -> Result<Vec<Stopword>> {
    phrases
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|p| !p.is_empty())
        .map(Stopword::new)
        .collect()
}

/// Compiles a stopword catalog, skipping phrases that fail to compile.
pub fn compile_stopwords_lenient<S: AsRef<str>>(phrases: &[S]) -> Vec<Stopword> {
    phrases
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|p| !p.is_empty())
        .filter_map(|phrase| match Stopword::new(phrase) {
            Ok(stopword) => Some(stopword),
            Err(e) => {
                tracing::warn!("Skipping stopword: {}", e);
                None
            }
        })
        .collect()
}

/// Removes each stopword in catalog order; later removals see the
/// already-shortened text.
pub fn strip_stopwords(text: &str, stopwords: &[Stopword]) -> String {
    let mut result = text.to_string();
    for stopword in stopwords {
        result = stopword.strip(&result);
    }
    result
}
