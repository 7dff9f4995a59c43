//! Query context data model.
//!
//! Structured description of what the *previous* dialog turn referenced:
//! which entity, which of its attributes were surfaced, and how the result
//! set was filtered. The upstream dialog-state component constructs one
//! [`CoreferenceContext`] per turn; recognizers only read it.

use serde::{Deserialize, Serialize};

/// Grammatical number of a referenced entity.
///
/// Drives phrase rendering: plural referents get a pluralized entity name
/// and may carry a filter phrase, singular referents use the entity name
/// unchanged and never carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrammaticalNumber {
    /// A single referenced entity ("it", "he", "she").
    Singular,
    /// A referenced result set ("they", "them", "we").
    Plural,
}

/// One attribute of the previously referenced entity: its name and the
/// value(s) known from the prior result.
///
/// An item with no values is skipped during phrase building rather than
/// rendered as an empty fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContextItem {
    /// Attribute name, e.g. `"color"` or `"order id"`.
    pub name: String,
    /// Known value(s) for the attribute, in result order.
    pub values: Vec<String>,
}

impl QueryContextItem {
    /// Create an item with a single value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    /// Create an item with multiple values.
    pub fn with_values<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Structured description of one referenced entity or result set from the
/// previous dialog turn.
///
/// `items` are the attributes explicitly surfaced in that turn; when none
/// of them occur in the new utterance, `primary_key_items` provide the
/// fallback identification. A plural context may additionally carry a
/// `filter_phrase` ("over $50") describing how the result set was narrowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Noun naming the referenced entity, e.g. `"order"` or `"customer"`.
    pub entity_name: String,
    /// Attributes explicitly surfaced in the prior turn (possibly empty).
    pub items: Vec<QueryContextItem>,
    /// Fallback identifying attributes, consulted only when no item from
    /// `items` occurs in the new utterance.
    pub primary_key_items: Vec<QueryContextItem>,
    /// Optional qualifying clause for plural referents, e.g. `"over $50"`.
    pub filter_phrase: Option<String>,
}

impl QueryContext {
    /// Create a context for the named entity with no items.
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            ..Self::default()
        }
    }

    /// Add a surfaced attribute.
    #[must_use]
    pub fn with_item(mut self, item: QueryContextItem) -> Self {
        self.items.push(item);
        self
    }

    /// Add a fallback identifying attribute.
    #[must_use]
    pub fn with_primary_key_item(mut self, item: QueryContextItem) -> Self {
        self.primary_key_items.push(item);
        self
    }

    /// Set the qualifying filter clause.
    #[must_use]
    pub fn with_filter_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.filter_phrase = Some(phrase.into());
        self
    }

    /// Names of the surfaced attributes, or `None` when there are none.
    pub(crate) fn item_names(&self) -> Option<Vec<&str>> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.iter().map(|item| item.name.as_str()).collect())
    }
}

/// The four query-context roles relevant to the previous turn, any of
/// which may be absent.
///
/// Roles are keyed by grammatical number and by whether the referent is a
/// person or an object; an ambiguous pronoun ("it", "they") is checked
/// against both the object and the person role of its cardinality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreferenceContext {
    /// Singular person referent ("he", "she").
    pub singular_person: Option<QueryContext>,
    /// Singular object referent ("it").
    pub singular_object: Option<QueryContext>,
    /// Plural person referent ("we", "us").
    pub plural_person: Option<QueryContext>,
    /// Plural object referent ("they", "them").
    pub plural_object: Option<QueryContext>,
}

impl CoreferenceContext {
    /// Create an empty context with all four roles absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the singular person role.
    #[must_use]
    pub fn with_singular_person(mut self, context: QueryContext) -> Self {
        self.singular_person = Some(context);
        self
    }

    /// Set the singular object role.
    #[must_use]
    pub fn with_singular_object(mut self, context: QueryContext) -> Self {
        self.singular_object = Some(context);
        self
    }

    /// Set the plural person role.
    #[must_use]
    pub fn with_plural_person(mut self, context: QueryContext) -> Self {
        self.plural_person = Some(context);
        self
    }

    /// Set the plural object role.
    #[must_use]
    pub fn with_plural_object(mut self, context: QueryContext) -> Self {
        self.plural_object = Some(context);
        self
    }

    /// Iterate over the roles that are present.
    pub fn present_roles(&self) -> impl Iterator<Item = &QueryContext> {
        [
            self.plural_object.as_ref(),
            self.plural_person.as_ref(),
            self.singular_object.as_ref(),
            self.singular_person.as_ref(),
        ]
        .into_iter()
        .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_items() {
        let ctx = QueryContext::new("order")
            .with_item(QueryContextItem::new("color", "red"))
            .with_primary_key_item(QueryContextItem::with_values("id", ["1", "2"]))
            .with_filter_phrase("over $50");

        assert_eq!(ctx.entity_name, "order");
        assert_eq!(ctx.items.len(), 1);
        assert_eq!(ctx.primary_key_items[0].values, vec!["1", "2"]);
        assert_eq!(ctx.filter_phrase.as_deref(), Some("over $50"));
    }

    #[test]
    fn item_names_empty_is_none() {
        let ctx = QueryContext::new("order");
        assert!(ctx.item_names().is_none());

        let ctx = ctx.with_item(QueryContextItem::new("color", "red"));
        assert_eq!(ctx.item_names(), Some(vec!["color"]));
    }

    #[test]
    fn present_roles_skips_absent_slots() {
        let ctx = CoreferenceContext::new()
            .with_singular_object(QueryContext::new("product"))
            .with_plural_person(QueryContext::new("customer"));

        let names: Vec<_> = ctx.present_roles().map(|c| c.entity_name.as_str()).collect();
        assert_eq!(names, vec!["customer", "product"]);
    }

    #[test]
    fn context_round_trips_through_serde() {
        let ctx = CoreferenceContext::new().with_plural_object(
            QueryContext::new("order")
                .with_primary_key_item(QueryContextItem::with_values("id", ["1", "2"]))
                .with_filter_phrase("over $50"),
        );

        let json = serde_json::to_string(&ctx).unwrap();
        let back: CoreferenceContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }
}
