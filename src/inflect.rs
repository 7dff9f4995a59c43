//! English noun pluralization.
//!
//! Small rule table in priority order: irregulars, uncountables, then
//! suffix rules. Only the final word of a noun phrase is inflected, so
//! `"sales order"` becomes `"sales orders"`.

// Irregular singular -> plural pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("ox", "oxen"),
];

// Nouns whose plural equals the singular.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "money",
    "news",
    "series",
    "sheep",
    "species",
    "staff",
    "fish",
    "deer",
];

/// Pluralize the final word of an English noun phrase.
///
/// Leading capitalization of the inflected word is preserved
/// (`"Person"` -> `"People"`).
///
/// # Example
///
/// ```rust
/// use anaphor::inflect::pluralize;
///
/// assert_eq!(pluralize("order"), "orders");
/// assert_eq!(pluralize("category"), "categories");
/// assert_eq!(pluralize("sales order"), "sales orders");
/// ```
#[must_use]
pub fn pluralize(noun_phrase: &str) -> String {
    let trimmed = noun_phrase.trim_end();
    let last_start = trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let (head, last) = trimmed.split_at(last_start);
    if last.is_empty() {
        return noun_phrase.to_string();
    }
    format!("{}{}", head, pluralize_word(last))
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, _)| *s == lower) {
        return match_capitalization(word, plural);
    }

    let plural_lower = if let Some(stem) = lower
        .strip_suffix('y')
        .filter(|stem| !stem.ends_with(['a', 'e', 'i', 'o', 'u']) && !stem.is_empty())
    {
        format!("{stem}ies")
    } else if lower.ends_with("fe") {
        format!("{}ves", &lower[..lower.len() - 2])
    } else if lower.ends_with('f') && !lower.ends_with("ff") {
        format!("{}ves", &lower[..lower.len() - 1])
    } else if lower.ends_with(['s', 'x', 'z'])
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        format!("{lower}es")
    } else {
        format!("{lower}s")
    };

    match_capitalization(word, &plural_lower)
}

// Re-apply the source word's leading capital to the lowercase plural.
fn match_capitalization(source: &str, plural_lower: &str) -> String {
    if source.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = plural_lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        plural_lower.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_suffix_rules() {
        assert_eq!(pluralize("order"), "orders");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("bus"), "buses");
        assert_eq!(pluralize("match"), "matches");
        assert_eq!(pluralize("dish"), "dishes");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("leaf"), "leaves");
        assert_eq!(pluralize("knife"), "knives");
        assert_eq!(pluralize("cliff"), "cliffs");
    }

    #[test]
    fn irregular_and_uncountable() {
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("child"), "children");
        assert_eq!(pluralize("sheep"), "sheep");
        assert_eq!(pluralize("information"), "information");
    }

    #[test]
    fn only_final_word_is_inflected() {
        assert_eq!(pluralize("sales order"), "sales orders");
        assert_eq!(pluralize("delivery person"), "delivery people");
    }

    #[test]
    fn capitalization_is_preserved() {
        assert_eq!(pluralize("Order"), "Orders");
        assert_eq!(pluralize("Person"), "People");
    }

    #[test]
    fn degenerate_input() {
        assert_eq!(pluralize(""), "");
        assert_eq!(pluralize("   "), "   ");
    }
}
