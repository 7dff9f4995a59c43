//! Identity recognizer for languages without rule support.

use crate::context::CoreferenceContext;
use crate::error::Result;
use crate::recognizers::CoreferenceRecognizer;

/// Recognizer that returns the utterance unchanged.
///
/// Safe default for languages without a rule-based implementation, and a
/// building block the multi-language chain can mix with rule-based
/// recognizers for other languages.
#[derive(Debug, Clone, Default)]
pub struct PassthroughRecognizer {
    utterance: String,
}

impl PassthroughRecognizer {
    /// Create the recognizer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CoreferenceRecognizer for PassthroughRecognizer {
    fn recognize(&mut self, _context: Option<&CoreferenceContext>, utterance: &str) -> Result<()> {
        self.utterance = utterance.to_string();
        Ok(())
    }

    fn resolve(&self) -> &str {
        &self.utterance
    }

    fn presumptive_reference_text(&self) -> Option<&str> {
        None
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}
