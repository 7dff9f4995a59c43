//! Coreference recognizers.
//!
//! All recognizers implement the [`CoreferenceRecognizer`] capability:
//! feed in the previous turn's [`CoreferenceContext`] and the current
//! utterance, read back the resolved utterance and any presumptive
//! reference text. Three variants are provided:
//!
//! | Recognizer | Behavior |
//! |------------|----------|
//! | [`english::RuleBasedEnglishRecognizer`] | pronoun rules + phrase generation |
//! | [`passthrough::PassthroughRecognizer`] | identity, for languages without rules |
//! | [`multi::MultiLanguageRecognizer`] | runs an ordered chain of recognizers |

pub mod english;
pub mod multi;
pub mod passthrough;

use crate::context::CoreferenceContext;
use crate::error::Result;

/// Capability contract for coreference recognition over one utterance.
///
/// State is reset at the start of every [`recognize`](Self::recognize)
/// call; nothing persists across dialog turns. An absent context makes the
/// call a no-op pass-through, never an error.
pub trait CoreferenceRecognizer: Send {
    /// Analyze `utterance` against the previous turn's context, storing
    /// results retrievable via [`resolve`](Self::resolve) and
    /// [`presumptive_reference_text`](Self::presumptive_reference_text).
    ///
    /// # Errors
    ///
    /// Only failures from the underlying linguistic analysis propagate;
    /// unmatched pronouns and malformed context entries are skipped
    /// silently.
    fn recognize(&mut self, context: Option<&CoreferenceContext>, utterance: &str) -> Result<()>;

    /// The utterance as resolved by the last [`recognize`](Self::recognize)
    /// call.
    fn resolve(&self) -> &str;

    /// Auxiliary text describing a referent that was resolved presumptively
    /// during the last call ("There is a product with color red"), if any.
    fn presumptive_reference_text(&self) -> Option<&str>;

    /// Short identifier for the recognizer variant.
    fn name(&self) -> &'static str;
}
