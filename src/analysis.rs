//! Linguistic analysis: tokenization, lemmatization, and lemma-pattern
//! matching.
//!
//! The recognizers depend on the [`LinguisticAnalyzer`] trait rather than a
//! concrete engine, so a production host can inject a full morphological
//! analyzer while tests run against a stub. [`SimpleEnglishAnalyzer`] is the
//! always-available built-in: a regex word tokenizer, a pronoun lexicon,
//! and a light suffix-stripping lemmatizer. It covers conversational
//! English well enough for rule-based resolution and keeps the crate
//! dependency-free at runtime.
//!
//! Pattern matching itself is engine-independent: [`Matcher`] holds named
//! [`LemmaPattern`]s and scans an [`AnalyzedText`] for all non-overlapping
//! matches in document order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

// =============================================================================
// Analyzed text
// =============================================================================

/// One token of an analyzed utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface text as it appears in the utterance.
    pub text: String,
    /// Base/dictionary form used for pattern matching.
    pub lemma: String,
    /// Byte offset of the token start in the source text.
    pub start: usize,
    /// Byte offset one past the token end.
    pub end: usize,
    /// Whether the token is a pronoun.
    pub pronoun: bool,
}

/// A tokenized and lemmatized utterance, retaining the source text so
/// matched token spans can be sliced back out verbatim.
#[derive(Debug, Clone)]
pub struct AnalyzedText {
    source: String,
    tokens: Vec<Token>,
}

impl AnalyzedText {
    /// Create an analyzed text from the source string and its tokens.
    ///
    /// Tokens are expected in document order with offsets into `source`.
    pub fn new(source: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            source: source.into(),
            tokens,
        }
    }

    /// The original text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The tokens in document order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Surface text covered by the token range `[start, end)`.
    pub fn span_text(&self, start: usize, end: usize) -> &str {
        if start >= end || end > self.tokens.len() {
            return "";
        }
        &self.source[self.tokens[start].start..self.tokens[end - 1].end]
    }
}

// =============================================================================
// Analyzer contract
// =============================================================================

/// Tokenization and lemmatization capability.
///
/// Implementations wrap whatever linguistic engine the host uses. They are
/// shared across recognizer instances via `Arc`, so they must be safe to
/// call from multiple threads; engines that are not internally thread-safe
/// should serialize access behind this trait.
pub trait LinguisticAnalyzer: Send + Sync {
    /// Tokenize and lemmatize `text`.
    ///
    /// Failures (e.g. malformed text rejected by the engine) propagate to
    /// the recognizer's caller unmodified.
    fn analyze(&self, text: &str) -> Result<AnalyzedText>;
}

// =============================================================================
// Lemma patterns
// =============================================================================

/// One element of a lemma pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternToken {
    /// Matches any token flagged as a pronoun.
    Pronoun,
    /// Matches a token whose lemma equals the given lemma (case-insensitive).
    Lemma(String),
}

/// An ordered sequence of pattern tokens matched against analyzed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LemmaPattern {
    tokens: Vec<PatternToken>,
}

impl LemmaPattern {
    /// Create a pattern from explicit tokens.
    pub fn new(tokens: Vec<PatternToken>) -> Self {
        Self { tokens }
    }

    /// Pattern matching a single bare pronoun.
    pub fn pronoun() -> Self {
        Self::new(vec![PatternToken::Pronoun])
    }

    /// Pattern matching a pronoun immediately followed by the words of an
    /// attribute name, e.g. `"order id"` yields `[Pronoun, "order", "id"]`.
    pub fn for_item(item_name: &str) -> Self {
        let mut tokens = vec![PatternToken::Pronoun];
        tokens.extend(
            item_name
                .split_whitespace()
                .map(|word| PatternToken::Lemma(word.to_lowercase())),
        );
        Self::new(tokens)
    }

    /// Number of tokens the pattern spans.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the pattern has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn matches_at(&self, tokens: &[Token], pos: usize) -> bool {
        if pos + self.tokens.len() > tokens.len() {
            return false;
        }
        self.tokens.iter().zip(&tokens[pos..]).all(|(pattern, token)| match pattern {
            PatternToken::Pronoun => token.pronoun,
            PatternToken::Lemma(lemma) => token.lemma.eq_ignore_ascii_case(lemma),
        })
    }
}

/// A match produced by [`Matcher::find_matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Name the pattern was registered under.
    pub pattern: String,
    /// Token index of the match start.
    pub start: usize,
    /// Token index one past the match end.
    pub end: usize,
    /// Surface text covered by the match.
    pub text: String,
}

/// Matches a set of named lemma patterns against analyzed text.
///
/// Matches are reported non-overlapping in document order; at each
/// position the longest matching pattern wins, ties broken by
/// registration order.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    patterns: Vec<(String, LemmaPattern)>,
}

impl Matcher {
    /// Create an empty matcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for an empty pattern.
    pub fn add(&mut self, name: impl Into<String>, pattern: LemmaPattern) -> Result<()> {
        let name = name.into();
        if pattern.is_empty() {
            return Err(Error::invalid_pattern(format!("empty pattern: {name}")));
        }
        self.patterns.push((name, pattern));
        Ok(())
    }

    /// All non-overlapping matches in document order.
    pub fn find_matches(&self, analyzed: &AnalyzedText) -> Vec<PatternMatch> {
        let tokens = analyzed.tokens();
        let mut matches = Vec::new();
        let mut pos = 0;
        while pos < tokens.len() {
            let mut best: Option<&(String, LemmaPattern)> = None;
            for entry in &self.patterns {
                if entry.1.matches_at(tokens, pos)
                    && best.is_none_or(|current| entry.1.len() > current.1.len())
                {
                    best = Some(entry);
                }
            }
            match best {
                Some((name, pattern)) => {
                    let end = pos + pattern.len();
                    matches.push(PatternMatch {
                        pattern: name.clone(),
                        start: pos,
                        end,
                        text: analyzed.span_text(pos, end).to_string(),
                    });
                    pos = end;
                }
                None => pos += 1,
            }
        }
        matches
    }
}

// =============================================================================
// Built-in English analyzer
// =============================================================================

static WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?|\d+(?:\.\d+)?").unwrap()
});

// English pronoun lexicon: personal, possessive, and reflexive forms.
const PRONOUNS: &[&str] = &[
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers",
    "herself", "it", "its", "itself", "they", "them", "their", "theirs", "themselves",
];

/// Built-in rule-based English analyzer.
///
/// Always available, no model files. A production host with a full
/// morphological engine should wrap it in its own [`LinguisticAnalyzer`]
/// implementation instead.
#[derive(Debug, Clone, Default)]
pub struct SimpleEnglishAnalyzer;

impl SimpleEnglishAnalyzer {
    /// Create the analyzer.
    pub fn new() -> Self {
        Self
    }

    // Lowercase plus plural suffix stripping. Deliberately shallow: item
    // names arrive in base form, so only the utterance side needs folding.
    fn lemma_of(word_lower: &str) -> String {
        if let Some(stem) = word_lower.strip_suffix("ies").filter(|s| !s.is_empty()) {
            return format!("{stem}y");
        }
        if ["ches", "shes", "sses", "xes", "zes"]
            .iter()
            .any(|suffix| word_lower.ends_with(suffix))
        {
            return word_lower[..word_lower.len() - 2].to_string();
        }
        if word_lower.len() > 3
            && word_lower.ends_with('s')
            && !word_lower.ends_with("ss")
            && !word_lower.ends_with("us")
            && !word_lower.ends_with("is")
        {
            return word_lower[..word_lower.len() - 1].to_string();
        }
        word_lower.to_string()
    }
}

impl LinguisticAnalyzer for SimpleEnglishAnalyzer {
    fn analyze(&self, text: &str) -> Result<AnalyzedText> {
        let mut tokens = Vec::new();
        for m in WORD.find_iter(text) {
            let lower = m.as_str().to_lowercase();
            let pronoun = PRONOUNS.contains(&lower.as_str());
            // Pronouns keep their surface form as lemma so category
            // classification can look at the exact word.
            let lemma = if pronoun { lower } else { Self::lemma_of(&lower) };
            tokens.push(Token {
                text: m.as_str().to_string(),
                lemma,
                start: m.start(),
                end: m.end(),
                pronoun,
            });
        }
        Ok(AnalyzedText::new(text, tokens))
    }
}
