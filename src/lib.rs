//! # anaphor
//!
//! Rule-based coreference resolution for single-turn dialog utterances.
//!
//! Given the structured result of the *previous* dialog turn (which entity
//! was discussed, which attributes, how the result set was filtered),
//! anaphor rewrites an incoming utterance so that pronouns like "it",
//! "they", and "them" are expanded into the full noun phrase they refer
//! to. "Show them" becomes "Show orders id 1 or id 2 (over $50)".
//!
//! ## Quick Start
//!
//! ```rust
//! use anaphor::recognizers::CoreferenceRecognizer;
//! use anaphor::{CoreferenceContext, QueryContext, QueryContextItem, RuleBasedEnglishRecognizer};
//!
//! // The previous turn discussed a product whose color is red.
//! let context = CoreferenceContext::new().with_singular_object(
//!     QueryContext::new("product").with_item(QueryContextItem::new("color", "red")),
//! );
//!
//! let mut recognizer = RuleBasedEnglishRecognizer::new();
//! recognizer.recognize(Some(&context), "What about its color?").unwrap();
//! assert_eq!(recognizer.resolve(), "What about color red?");
//! ```
//!
//! ## Recognizers
//!
//! | Recognizer | Behavior |
//! |------------|----------|
//! | [`RuleBasedEnglishRecognizer`] | pronoun rules + phrase generation |
//! | [`PassthroughRecognizer`] | identity, for languages without rules |
//! | [`MultiLanguageRecognizer`] | ordered chain of recognizers |
//!
//! The multi-language recognizer runs its chain over one utterance in
//! order, so later recognizers see the replacements made by earlier ones,
//! and space-joins any presumptive reference texts the chain produced.
//!
//! ## Design Philosophy
//!
//! - **Rule-driven**: no statistical models, no training data; resolution
//!   follows a fixed pronoun category table and a small phrase grammar
//! - **Single-turn**: only the immediately preceding turn's context is
//!   consulted, supplied fresh by the caller on every call
//! - **Trait-based**: all recognizers implement
//!   [`CoreferenceRecognizer`](recognizers::CoreferenceRecognizer), and the
//!   English recognizer takes its [`LinguisticAnalyzer`] by injection so
//!   tests can run against a stub
//! - **Never fails on structured input**: absent contexts, unmatched
//!   pronouns, and valueless items are skipped, not reported

#![warn(missing_docs)]

pub mod analysis;
pub mod context;
mod error;
pub mod inflect;
pub mod recognizers;

pub use analysis::{
    AnalyzedText, LemmaPattern, LinguisticAnalyzer, Matcher, PatternMatch, PatternToken,
    SimpleEnglishAnalyzer, Token,
};
pub use context::{CoreferenceContext, GrammaticalNumber, QueryContext, QueryContextItem};
pub use error::{Error, Result};
pub use recognizers::english::RuleBasedEnglishRecognizer;
pub use recognizers::multi::MultiLanguageRecognizer;
pub use recognizers::passthrough::PassthroughRecognizer;
