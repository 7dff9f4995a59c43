//! Error types for anaphor.

use thiserror::Error;

/// Result type for anaphor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for anaphor operations.
///
/// Recognition itself never fails on structured input: absent contexts,
/// unmatched pronouns, and items without values are all skipped silently.
/// The only fallible boundary is the linguistic analysis collaborator.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Linguistic analysis of an utterance failed.
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// A lemma pattern could not be registered.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

impl Error {
    /// Create an analysis error.
    pub fn analysis(msg: impl Into<String>) -> Self {
        Error::Analysis(msg.into())
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Error::InvalidPattern(msg.into())
    }
}
