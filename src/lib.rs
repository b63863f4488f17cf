//! # unhallu
//!
//! A fast post-processing filter that strips hallucinations from
//! speech-to-text transcripts: looping words and syllables, sign-off phrases
//! and subtitle credits, filler interjections, stray Hangul jamo and short
//! fragments in scripts the transcript should not contain.
//!
//! ## Quick Start
//!
//! ```
//! use unhallu::{clean_default, CleanOptions, Cleaner};
//!
//! assert_eq!(clean_default("very good very good very good"), "very good");
//!
//! let cleaner = Cleaner::new(CleanOptions::korean_only())?;
//! assert_eq!(cleaner.clean("고추장고추장고추장"), "고추장");
//! # Ok::<(), unhallu::Error>(())
//! ```
//!
//! Cleaning is total: any string goes in, a string comes out. Empty or
//! whitespace-only input is returned unchanged, and input that would be
//! erased entirely keeps one of its original tokens.
//!
//! ## Features
//!
//! - `python`: Python bindings via PyO3

pub mod cleanup;
pub mod error;
pub mod language;
pub mod options;

#[cfg(feature = "python")]
pub mod python;

// Re-exports
pub use cleanup::{clean, clean_default, CleanReport, Cleaner, Stage, StageChange};
pub use error::{Error, Result};
pub use language::Language;
pub use options::CleanOptions;

/// Cleans many transcripts in parallel with one set of options.
///
/// Stopwords that cannot be compiled are skipped, as with [`clean`].
pub fn clean_batch<S>(texts: &[S], options: &CleanOptions) -> Vec<String>
where
    S: AsRef<str> + Sync,
{
    Cleaner::lenient(options.clone()).clean_batch(texts)
}
