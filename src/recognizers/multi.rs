//! Multi-language recognizer chain.

use crate::context::CoreferenceContext;
use crate::error::Result;
use crate::recognizers::CoreferenceRecognizer;

/// Runs an ordered chain of recognizers over one utterance.
///
/// Each recognizer sees the text as resolved by the ones before it, so
/// later recognizers operate on earlier replacements. Presumptive
/// reference texts from the chain are space-joined.
///
/// # Example
///
/// ```rust
/// use anaphor::recognizers::multi::MultiLanguageRecognizer;
/// use anaphor::recognizers::passthrough::PassthroughRecognizer;
/// use anaphor::recognizers::CoreferenceRecognizer;
/// use anaphor::RuleBasedEnglishRecognizer;
///
/// let mut chain = MultiLanguageRecognizer::new()
///     .with_recognizer(Box::new(RuleBasedEnglishRecognizer::new()))
///     .with_recognizer(Box::new(PassthroughRecognizer::new()));
///
/// chain.recognize(None, "Is it available?").unwrap();
/// assert_eq!(chain.resolve(), "Is it available?");
/// ```
#[derive(Default)]
pub struct MultiLanguageRecognizer {
    recognizers: Vec<Box<dyn CoreferenceRecognizer>>,
    utterance: String,
    presumptive_reference_text: Option<String>,
}

impl MultiLanguageRecognizer {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recognizer to the chain.
    pub fn add_recognizer(&mut self, recognizer: Box<dyn CoreferenceRecognizer>) {
        self.recognizers.push(recognizer);
    }

    /// Append a recognizer, builder style.
    #[must_use]
    pub fn with_recognizer(mut self, recognizer: Box<dyn CoreferenceRecognizer>) -> Self {
        self.add_recognizer(recognizer);
        self
    }
}

impl CoreferenceRecognizer for MultiLanguageRecognizer {
    fn recognize(&mut self, context: Option<&CoreferenceContext>, utterance: &str) -> Result<()> {
        self.utterance = utterance.to_string();
        self.presumptive_reference_text = None;
        let Some(context) = context else {
            return Ok(());
        };

        let mut presumptive_texts = Vec::new();
        for recognizer in &mut self.recognizers {
            recognizer.recognize(Some(context), &self.utterance)?;
            self.utterance = recognizer.resolve().to_string();
            if let Some(text) = recognizer.presumptive_reference_text() {
                presumptive_texts.push(text.to_string());
            }
        }
        if !presumptive_texts.is_empty() {
            self.presumptive_reference_text = Some(presumptive_texts.join(" "));
        }
        Ok(())
    }

    fn resolve(&self) -> &str {
        &self.utterance
    }

    fn presumptive_reference_text(&self) -> Option<&str> {
        self.presumptive_reference_text.as_deref()
    }

    fn name(&self) -> &'static str {
        "multi-language"
    }
}
