//! Rule-based English coreference recognizer.
//!
//! Resolves pronouns in a new utterance against the previous turn's query
//! contexts in two passes over a single analysis of the incoming text:
//!
//! 1. **Attribute references**: a pronoun immediately followed by a known
//!    attribute name ("its color") stands in for the attribute, and is
//!    replaced by the attribute's known value ("color red").
//! 2. **Entity references**: a bare pronoun ("it", "them") stands in for
//!    the whole entity, and is replaced by a generated noun phrase
//!    ("product with color red", "orders id 1 or id 2 (over $50)").
//!
//! A pronoun is classified by cardinality and then resolved against both
//! the object and the person query context of that cardinality, unless the
//! word belongs exclusively to one category's set. Two of the exclusive
//! sets below are empty, so in the current rule table every shared pronoun
//! drives both dispatches; the first successfully rendered phrase wins the
//! replacement. The empty sets are kept so the exclusion rule stays
//! visible at the dispatch sites.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::analysis::{
    AnalyzedText, LemmaPattern, LinguisticAnalyzer, Matcher, SimpleEnglishAnalyzer,
};
use crate::context::{CoreferenceContext, GrammaticalNumber, QueryContext, QueryContextItem};
use crate::error::Result;
use crate::inflect::pluralize;
use crate::recognizers::CoreferenceRecognizer;

// =============================================================================
// Pronoun category sets
// =============================================================================

// Number-ambiguous pronouns, checked against both roles of their
// cardinality.
const COMMON_SINGULAR_PRONOUNS: &[&str] = &["it", "its"];
const COMMON_PLURAL_PRONOUNS: &[&str] = &["they", "their", "them", "theirs"];

// Pronouns exclusive to one category. An empty object set means no
// singular/plural pronoun is object-exclusive in the current rule table.
const SINGULAR_PERSON_PRONOUNS: &[&str] =
    &["i", "me", "mine", "he", "him", "his", "she", "her", "hers"];
const SINGULAR_OBJECT_PRONOUNS: &[&str] = &[];
const PLURAL_PERSON_PRONOUNS: &[&str] = &["our", "ours", "we", "us"];
const PLURAL_OBJECT_PRONOUNS: &[&str] = &[];

static SINGULAR_PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    COMMON_SINGULAR_PRONOUNS
        .iter()
        .chain(SINGULAR_OBJECT_PRONOUNS)
        .chain(SINGULAR_PERSON_PRONOUNS)
        .copied()
        .collect()
});

static PLURAL_PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    COMMON_PLURAL_PRONOUNS
        .iter()
        .chain(PLURAL_OBJECT_PRONOUNS)
        .chain(PLURAL_PERSON_PRONOUNS)
        .copied()
        .collect()
});

// =============================================================================
// Recognizer
// =============================================================================

/// Rule-based English coreference recognizer.
///
/// # Example
///
/// ```rust
/// use anaphor::recognizers::CoreferenceRecognizer;
/// use anaphor::{CoreferenceContext, QueryContext, QueryContextItem, RuleBasedEnglishRecognizer};
///
/// let context = CoreferenceContext::new().with_singular_object(
///     QueryContext::new("product").with_item(QueryContextItem::new("color", "red")),
/// );
///
/// let mut recognizer = RuleBasedEnglishRecognizer::new();
/// recognizer.recognize(Some(&context), "What about its color?").unwrap();
/// assert_eq!(recognizer.resolve(), "What about color red?");
/// ```
pub struct RuleBasedEnglishRecognizer {
    analyzer: Arc<dyn LinguisticAnalyzer>,
    utterance: String,
    presumptive_reference_text: Option<String>,
}

impl Default for RuleBasedEnglishRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedEnglishRecognizer {
    /// Create a recognizer backed by the built-in
    /// [`SimpleEnglishAnalyzer`].
    pub fn new() -> Self {
        Self::with_analyzer(Arc::new(SimpleEnglishAnalyzer::new()))
    }

    /// Create a recognizer backed by the given analyzer.
    ///
    /// The analyzer is shared, so one vocabulary can serve every
    /// recognizer instance in the process.
    pub fn with_analyzer(analyzer: Arc<dyn LinguisticAnalyzer>) -> Self {
        Self {
            analyzer,
            utterance: String::new(),
            presumptive_reference_text: None,
        }
    }

    /// Attribute-reference pass: pronoun followed by a known attribute
    /// name, drawn from the items of every present query context role.
    fn recognize_attribute_references(
        &mut self,
        context: &CoreferenceContext,
        analyzed: &AnalyzedText,
    ) -> Result<()> {
        let mut matcher = Matcher::new();
        let mut seen = HashSet::new();
        for query_context in context.present_roles() {
            for item in &query_context.items {
                if seen.insert(item.name.as_str()) {
                    matcher.add(&item.name, LemmaPattern::for_item(&item.name))?;
                }
            }
        }

        for m in matcher.find_matches(analyzed) {
            let Some(pronoun) = pronoun_in_span(analyzed, m.start, m.end) else {
                continue;
            };
            self.resolve_match(context, analyzed, &m.text, &pronoun, true, None);
        }
        Ok(())
    }

    /// Entity-reference pass: every bare pronoun in the utterance.
    fn recognize_entity_references(
        &mut self,
        context: &CoreferenceContext,
        analyzed: &AnalyzedText,
        presumptive_texts: &mut Vec<String>,
    ) -> Result<()> {
        let mut matcher = Matcher::new();
        matcher.add("pronoun", LemmaPattern::pronoun())?;

        for m in matcher.find_matches(analyzed) {
            let pronoun = analyzed.tokens()[m.start].lemma.clone();
            self.resolve_match(
                context,
                analyzed,
                &m.text,
                &pronoun,
                false,
                Some(&mut *presumptive_texts),
            );
        }
        Ok(())
    }

    /// Classify a pronoun and resolve it against the eligible query
    /// context roles, object before person. The first rendered phrase
    /// replaces the first textual occurrence of the matched span.
    fn resolve_match(
        &mut self,
        context: &CoreferenceContext,
        analyzed: &AnalyzedText,
        matched_text: &str,
        pronoun: &str,
        attribute_reference: bool,
        mut presumptive_texts: Option<&mut Vec<String>>,
    ) {
        let mut candidates: Vec<(Option<&QueryContext>, GrammaticalNumber)> = Vec::new();
        if SINGULAR_PRONOUNS.contains(pronoun) {
            if !SINGULAR_PERSON_PRONOUNS.contains(&pronoun) {
                candidates.push((context.singular_object.as_ref(), GrammaticalNumber::Singular));
            }
            if !SINGULAR_OBJECT_PRONOUNS.contains(&pronoun) {
                candidates.push((context.singular_person.as_ref(), GrammaticalNumber::Singular));
            }
        }
        if PLURAL_PRONOUNS.contains(pronoun) {
            if !PLURAL_PERSON_PRONOUNS.contains(&pronoun) {
                candidates.push((context.plural_object.as_ref(), GrammaticalNumber::Plural));
            }
            if !PLURAL_OBJECT_PRONOUNS.contains(&pronoun) {
                candidates.push((context.plural_person.as_ref(), GrammaticalNumber::Plural));
            }
        }

        for (query_context, number) in candidates {
            let Some(query_context) = query_context else {
                continue;
            };
            let options = PhraseOptions {
                attribute_reference,
                presumptive: false,
            };
            let Some(built) = build_phrase(query_context, number, analyzed, options) else {
                continue;
            };

            if let Some(idx) = self.utterance.find(matched_text) {
                self.utterance
                    .replace_range(idx..idx + matched_text.len(), &built.text);
                log::debug!("replaced {matched_text:?} with {:?}", built.text);
            }

            // A bare pronoun resolved through fallback items named no
            // explicit attribute, so the referent is an assumption worth
            // stating back to the user.
            if built.primary_key_fallback && built.pair_count == 1 {
                if let Some(texts) = presumptive_texts.as_deref_mut() {
                    let presumptive_options = PhraseOptions {
                        attribute_reference,
                        presumptive: true,
                    };
                    if let Some(presumptive) =
                        build_phrase(query_context, number, analyzed, presumptive_options)
                    {
                        log::trace!("presumptive reference: {:?}", presumptive.text);
                        texts.push(presumptive.text);
                    }
                }
            }
            break;
        }
    }
}

impl CoreferenceRecognizer for RuleBasedEnglishRecognizer {
    fn recognize(&mut self, context: Option<&CoreferenceContext>, utterance: &str) -> Result<()> {
        self.utterance = utterance.to_string();
        self.presumptive_reference_text = None;
        let Some(context) = context else {
            return Ok(());
        };

        // Both passes match against one analysis of the incoming text;
        // replacements edit the evolving utterance string.
        let analyzed = self.analyzer.analyze(utterance)?;
        let mut presumptive_texts = Vec::new();
        self.recognize_attribute_references(context, &analyzed)?;
        self.recognize_entity_references(context, &analyzed, &mut presumptive_texts)?;
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
        "rule-based-english"
    }
}

/// Lemma of the first pronoun token inside a matched token span.
fn pronoun_in_span(analyzed: &AnalyzedText, start: usize, end: usize) -> Option<String> {
    analyzed.tokens()[start..end]
        .iter()
        .find(|token| token.pronoun)
        .map(|token| token.lemma.clone())
}

// =============================================================================
// Phrase builder
// =============================================================================

const ITEM_SEPARATOR: &str = " or ";
const WITH_PREPOSITION: &str = "with";
const PRESUMPTIVE_PREFIX: &str = "There is a";

/// Flags controlling phrase composition.
#[derive(Debug, Clone, Copy, Default)]
struct PhraseOptions {
    /// The pronoun stood in for an attribute name, not the whole entity:
    /// omit the preposition and the entity-name prefix.
    attribute_reference: bool,
    /// The mention had no explicit antecedent noun: render a single-pair
    /// phrase as an assertion instead of a restatement.
    presumptive: bool,
}

/// A rendered context phrase plus the facts the caller needs to decide
/// what to do with it.
#[derive(Debug, Clone)]
struct BuiltPhrase {
    text: String,
    /// Total attribute name/value pairs rendered.
    pair_count: usize,
    /// The phrase was built from fallback items rather than items that
    /// occur in the utterance.
    primary_key_fallback: bool,
}

// Composition decision table ("P" is the presumptive prefix):
//
//   attribute_reference | pairs | presumptive | shape
//   --------------------+-------+-------------+--------------------------------
//   true                |   1   | true        | P <name value>
//   true                |   1   | false       | <name value>
//   true                |  >1   | any         | <name value> or <name value>
//   false               |   1   | true        | P <entity> with <name value>
//   false               |   1   | false       | <entity> with <name value>
//   false               |  >1   | any         | <entity> <name value> or <...>
//   false               |   0   | any         | <entity>        (plural only)
//
// Plural contexts pluralize the entity name and append the parenthesized
// filter phrase to whichever shape was chosen; singular contexts use the
// entity name unchanged and never carry a filter phrase.
fn build_phrase(
    query_context: &QueryContext,
    number: GrammaticalNumber,
    analyzed: &AnalyzedText,
    options: PhraseOptions,
) -> Option<BuiltPhrase> {
    let entity_name = match number {
        GrammaticalNumber::Plural => pluralize(&query_context.entity_name),
        GrammaticalNumber::Singular => query_context.entity_name.clone(),
    };

    let (selected, primary_key_fallback) = select_items(query_context, analyzed);

    let mut fragments = Vec::new();
    let mut pair_count = 0;
    for item in &selected {
        let pairs: Vec<String> = item
            .values
            .iter()
            .map(|value| format!("{} {}", item.name, value))
            .collect();
        pair_count += pairs.len();
        fragments.push(pairs.join(ITEM_SEPARATOR));
    }
    let body = fragments.join(ITEM_SEPARATOR);

    let mut text = if options.attribute_reference {
        if fragments.is_empty() {
            return None;
        }
        if options.presumptive && pair_count == 1 {
            format!("{PRESUMPTIVE_PREFIX} {body}")
        } else {
            body
        }
    } else if fragments.is_empty() {
        // A plural referent is still describable by entity name and filter
        // phrase alone; a singular one is not.
        match number {
            GrammaticalNumber::Plural => entity_name.clone(),
            GrammaticalNumber::Singular => return None,
        }
    } else if pair_count == 1 {
        if options.presumptive {
            format!("{PRESUMPTIVE_PREFIX} {entity_name} {WITH_PREPOSITION} {body}")
        } else {
            format!("{entity_name} {WITH_PREPOSITION} {body}")
        }
    } else {
        format!("{entity_name} {body}")
    };

    if number == GrammaticalNumber::Plural {
        if let Some(filter) = &query_context.filter_phrase {
            text = format!("{text} ({filter})");
        }
    }

    Some(BuiltPhrase {
        text,
        pair_count,
        primary_key_fallback,
    })
}

/// Pick the items a phrase is built from.
///
/// Items whose name occurs in the utterance (pronoun followed by the name's
/// lemmas) come first; otherwise primary-key items identify the referent;
/// otherwise every configured item describes it. Items without values are
/// dropped throughout.
fn select_items<'a>(
    query_context: &'a QueryContext,
    analyzed: &AnalyzedText,
) -> (Vec<&'a QueryContextItem>, bool) {
    let matched: Vec<&QueryContextItem> = query_context
        .items
        .iter()
        .filter(|item| !item.values.is_empty())
        .filter(|item| item_occurs(&item.name, analyzed))
        .collect();
    if !matched.is_empty() {
        return (matched, false);
    }

    let primary: Vec<&QueryContextItem> = query_context
        .primary_key_items
        .iter()
        .filter(|item| !item.values.is_empty())
        .collect();
    if !primary.is_empty() {
        return (primary, true);
    }

    let all: Vec<&QueryContextItem> = query_context
        .items
        .iter()
        .filter(|item| !item.values.is_empty())
        .collect();
    (all, true)
}

fn item_occurs(name: &str, analyzed: &AnalyzedText) -> bool {
    let mut matcher = Matcher::new();
    if matcher.add(name, LemmaPattern::for_item(name)).is_err() {
        return false;
    }
    !matcher.find_matches(analyzed).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SimpleEnglishAnalyzer;

    fn analyze(text: &str) -> AnalyzedText {
        SimpleEnglishAnalyzer::new().analyze(text).unwrap()
    }

    fn product_context() -> QueryContext {
        QueryContext::new("product").with_item(QueryContextItem::new("color", "red"))
    }

    // =========================================================================
    // Phrase builder decision table
    // =========================================================================

    #[test]
    fn attribute_reference_single_pair_has_no_preposition() {
        let analyzed = analyze("What about its color?");
        let built = build_phrase(
            &product_context(),
            GrammaticalNumber::Singular,
            &analyzed,
            PhraseOptions {
                attribute_reference: true,
                presumptive: false,
            },
        )
        .unwrap();
        assert_eq!(built.text, "color red");
        assert_eq!(built.pair_count, 1);
        assert!(!built.primary_key_fallback);
    }

    #[test]
    fn entity_reference_single_pair_uses_with() {
        let analyzed = analyze("What about its color?");
        let built = build_phrase(
            &product_context(),
            GrammaticalNumber::Singular,
            &analyzed,
            PhraseOptions::default(),
        )
        .unwrap();
        assert_eq!(built.text, "product with color red");
    }

    #[test]
    fn presumptive_single_pair_starts_with_assertion() {
        let analyzed = analyze("Is it available?");
        let built = build_phrase(
            &product_context(),
            GrammaticalNumber::Singular,
            &analyzed,
            PhraseOptions {
                attribute_reference: false,
                presumptive: true,
            },
        )
        .unwrap();
        assert_eq!(built.text, "There is a product with color red");
        assert_eq!(built.text.matches("product").count(), 1);
        assert!(built.primary_key_fallback);
    }

    #[test]
    fn multiple_pairs_drop_with_and_join_with_or() {
        let context = QueryContext::new("order")
            .with_primary_key_item(QueryContextItem::with_values("id", ["1", "2"]));
        let analyzed = analyze("Show them");
        let built = build_phrase(
            &context,
            GrammaticalNumber::Plural,
            &analyzed,
            PhraseOptions::default(),
        )
        .unwrap();
        assert_eq!(built.text, "orders id 1 or id 2");
        assert_eq!(built.pair_count, 2);
    }

    #[test]
    fn plural_appends_parenthesized_filter_phrase() {
        let context = QueryContext::new("order")
            .with_primary_key_item(QueryContextItem::with_values("id", ["1", "2"]))
            .with_filter_phrase("over $50");
        let analyzed = analyze("Show them");
        let built = build_phrase(
            &context,
            GrammaticalNumber::Plural,
            &analyzed,
            PhraseOptions::default(),
        )
        .unwrap();
        assert_eq!(built.text, "orders id 1 or id 2 (over $50)");
    }

    #[test]
    fn plural_without_items_renders_entity_and_filter() {
        let context = QueryContext::new("order").with_filter_phrase("over $50");
        let analyzed = analyze("Show them");
        let built = build_phrase(
            &context,
            GrammaticalNumber::Plural,
            &analyzed,
            PhraseOptions::default(),
        )
        .unwrap();
        assert_eq!(built.text, "orders (over $50)");
        assert_eq!(built.pair_count, 0);
    }

    #[test]
    fn singular_without_items_renders_nothing() {
        let context = QueryContext::new("product");
        let analyzed = analyze("Is it available?");
        assert!(build_phrase(
            &context,
            GrammaticalNumber::Singular,
            &analyzed,
            PhraseOptions::default(),
        )
        .is_none());
    }

    #[test]
    fn items_without_values_are_skipped() {
        let context = QueryContext::new("product")
            .with_item(QueryContextItem::with_values("color", Vec::<String>::new()))
            .with_item(QueryContextItem::new("size", "large"));
        let analyzed = analyze("Show me its color and its size");
        let built = build_phrase(
            &context,
            GrammaticalNumber::Singular,
            &analyzed,
            PhraseOptions::default(),
        )
        .unwrap();
        assert_eq!(built.text, "product with size large");
    }

    #[test]
    fn matched_items_beat_primary_keys() {
        let context = QueryContext::new("product")
            .with_item(QueryContextItem::new("color", "red"))
            .with_primary_key_item(QueryContextItem::new("sku", "A-1"));
        let analyzed = analyze("What about its color?");
        let built = build_phrase(
            &context,
            GrammaticalNumber::Singular,
            &analyzed,
            PhraseOptions::default(),
        )
        .unwrap();
        assert_eq!(built.text, "product with color red");
        assert!(!built.primary_key_fallback);
    }

    #[test]
    fn unmatched_items_fall_back_to_primary_keys() {
        let context = QueryContext::new("product")
            .with_item(QueryContextItem::new("color", "red"))
            .with_primary_key_item(QueryContextItem::new("sku", "A-1"));
        let analyzed = analyze("Is it available?");
        let built = build_phrase(
            &context,
            GrammaticalNumber::Singular,
            &analyzed,
            PhraseOptions::default(),
        )
        .unwrap();
        assert_eq!(built.text, "product with sku A-1");
        assert!(built.primary_key_fallback);
    }

    // =========================================================================
    // Recognition and dispatch
    // =========================================================================

    fn recognize(context: &CoreferenceContext, utterance: &str) -> RuleBasedEnglishRecognizer {
        let mut recognizer = RuleBasedEnglishRecognizer::new();
        recognizer.recognize(Some(context), utterance).unwrap();
        recognizer
    }

    #[test]
    fn attribute_reference_is_resolved_in_place() {
        let context = CoreferenceContext::new().with_singular_object(product_context());
        let recognizer = recognize(&context, "What about its color?");
        assert_eq!(recognizer.resolve(), "What about color red?");
    }

    #[test]
    fn bare_pronoun_is_resolved_to_entity_phrase() {
        let context = CoreferenceContext::new().with_singular_object(product_context());
        let recognizer = recognize(&context, "Is it available?");
        assert_eq!(recognizer.resolve(), "Is product with color red available?");
        assert_eq!(
            recognizer.presumptive_reference_text(),
            Some("There is a product with color red")
        );
    }

    #[test]
    fn absent_context_is_identity() {
        let mut recognizer = RuleBasedEnglishRecognizer::new();
        recognizer.recognize(None, "Is it available?").unwrap();
        assert_eq!(recognizer.resolve(), "Is it available?");
        assert!(recognizer.presumptive_reference_text().is_none());
    }

    #[test]
    fn missing_role_is_skipped_silently() {
        // "it" is shared between object and person; only person is present.
        let context = CoreferenceContext::new().with_singular_person(
            QueryContext::new("customer").with_primary_key_item(QueryContextItem::new("name", "Kim")),
        );
        let recognizer = recognize(&context, "Is it active?");
        assert_eq!(recognizer.resolve(), "Is customer with name Kim active?");
    }

    #[test]
    fn person_exclusive_pronoun_skips_object_context() {
        // "we" is plural-person exclusive; the object context must not win
        // even though it is listed first.
        let context = CoreferenceContext::new()
            .with_plural_object(
                QueryContext::new("order").with_primary_key_item(QueryContextItem::new("id", "1")),
            )
            .with_plural_person(
                QueryContext::new("customer")
                    .with_primary_key_item(QueryContextItem::new("region", "west")),
            );
        let recognizer = recognize(&context, "Can we proceed?");
        assert_eq!(
            recognizer.resolve(),
            "Can customers with region west proceed?"
        );
    }

    #[test]
    fn shared_pronoun_prefers_object_context() {
        let context = CoreferenceContext::new()
            .with_plural_object(
                QueryContext::new("order").with_primary_key_item(QueryContextItem::new("id", "1")),
            )
            .with_plural_person(
                QueryContext::new("customer")
                    .with_primary_key_item(QueryContextItem::new("region", "west")),
            );
        let recognizer = recognize(&context, "Show them");
        assert_eq!(recognizer.resolve(), "Show orders with id 1");
    }

    #[test]
    fn shared_pronoun_falls_through_to_person_context() {
        // Object role present but unrenderable (no items at all, singular):
        // the person dispatch still gets its chance.
        let context = CoreferenceContext::new()
            .with_singular_object(QueryContext::new("product"))
            .with_singular_person(
                QueryContext::new("customer").with_primary_key_item(QueryContextItem::new("name", "Kim")),
            );
        let recognizer = recognize(&context, "Is it active?");
        assert_eq!(recognizer.resolve(), "Is customer with name Kim active?");
    }

    #[test]
    fn unclassified_pronoun_is_left_alone() {
        // "you" is a pronoun but belongs to neither cardinality set.
        let context = CoreferenceContext::new().with_singular_object(product_context());
        let recognizer = recognize(&context, "Can you confirm?");
        assert_eq!(recognizer.resolve(), "Can you confirm?");
    }

    #[test]
    fn capitalized_pronoun_is_replaced_by_surface_text() {
        let context = CoreferenceContext::new().with_plural_object(
            QueryContext::new("order").with_primary_key_item(QueryContextItem::new("id", "7")),
        );
        let recognizer = recognize(&context, "They arrived");
        assert_eq!(recognizer.resolve(), "orders with id 7 arrived");
    }

    #[test]
    fn attribute_pass_runs_before_entity_pass() {
        // "its color" is consumed by the attribute pass; the entity pass
        // then finds no remaining "its" to replace.
        let context = CoreferenceContext::new().with_singular_object(product_context());
        let recognizer = recognize(&context, "What about its color?");
        assert_eq!(recognizer.resolve(), "What about color red?");
        assert!(recognizer.presumptive_reference_text().is_none());
    }

    #[test]
    fn state_resets_between_calls() {
        let context = CoreferenceContext::new().with_singular_object(product_context());
        let mut recognizer = RuleBasedEnglishRecognizer::new();
        recognizer.recognize(Some(&context), "Is it available?").unwrap();
        assert!(recognizer.presumptive_reference_text().is_some());

        recognizer.recognize(Some(&context), "No pronouns here").unwrap();
        assert_eq!(recognizer.resolve(), "No pronouns here");
        assert!(recognizer.presumptive_reference_text().is_none());
    }
}
