//! Keyword-based category tagging.
//!
//! A chunk is tagged with every category that has at least one keyword
//! occurring in its lower-cased text. Chunks that match nothing get the single
//! [`UNCATEGORIZED`] tag, so the tag set is never empty.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Tag given to chunks that match no category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// How keywords are matched against chunk text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain substring containment; `art` matches inside `smart`.
    #[default]
    Substring,
    /// The keyword must not be flanked by alphanumeric characters.
    WordBoundary,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "word_boundary" | "word-boundary" | "word" => Ok(MatchMode::WordBoundary),
            other => Err(format!("unknown match mode '{other}'")),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Substring => write!(f, "substring"),
            MatchMode::WordBoundary => write!(f, "word_boundary"),
        }
    }
}

/// Category name to ordered keyword list.
///
/// Keywords are expected in lower case. Categories are kept in name order so
/// output is deterministic; keyword order only affects which keyword ends the
/// scan of a category, never the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    categories: BTreeMap<String, Vec<String>>,
}

impl CategoryTable {
    /// An empty table; every chunk is uncategorized.
    pub fn empty() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }

    /// Add or replace a category.
    pub fn with_category<I, S>(mut self, name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, keywords);
        self
    }

    /// Add or replace a category in place.
    pub fn insert<I, S>(&mut self, name: impl Into<String>, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .insert(name.into(), keywords.into_iter().map(Into::into).collect());
    }

    /// Iterate over `(category, keywords)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, kws)| (name.as_str(), kws.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Check the table for entries that can never match or match everything.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, keywords) in &self.categories {
            if name.trim().is_empty() {
                return Err("category names must not be empty".to_string());
            }
            if name == UNCATEGORIZED {
                return Err(format!("'{UNCATEGORIZED}' is reserved"));
            }
            if keywords.iter().any(|k| k.is_empty()) {
                return Err(format!("category '{name}' has an empty keyword"));
            }
        }
        Ok(())
    }
}

impl Default for CategoryTable {
    /// Categories for local event listings.
    fn default() -> Self {
        Self::empty()
            .with_category(
                "food",
                [
                    "food", "restaurant", "eats", "dine", "drink", "culinary", "tasting",
                    "brunch", "chefs", "beer", "wine", "bites",
                ],
            )
            .with_category(
                "music",
                [
                    "concert", "band", "dj", "music", "jazz", "live", "performance",
                    "orchestra", "acoustic", "beats", "gig",
                ],
            )
            .with_category(
                "family",
                [
                    "kids", "family", "children", "parents", "craft", "games", "puppet", "art",
                    "storytime", "outdoor",
                ],
            )
            .with_category(
                "festival",
                [
                    "festival", "parade", "carnival", "celebration", "fair", "block party",
                    "street fair",
                ],
            )
            .with_category(
                "shopping",
                [
                    "market", "vendor", "popup", "shopping", "handmade", "boutique",
                    "craft fair", "retail",
                ],
            )
            .with_category(
                "cultural",
                [
                    "heritage", "tradition", "diwali", "chinese new year", "black history",
                    "latino", "asian", "indigenous",
                ],
            )
            .with_category(
                "wellness",
                ["yoga", "meditation", "wellness", "fitness", "hike", "run", "health"],
            )
    }
}

/// Tag text with substring matching.
pub fn tag(text: &str, categories: &CategoryTable) -> BTreeSet<String> {
    tag_with_mode(text, categories, MatchMode::Substring)
}

/// Tag text using the given match mode.
pub fn tag_with_mode(text: &str, categories: &CategoryTable, mode: MatchMode) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    let mut tags = BTreeSet::new();

    for (category, keywords) in categories.iter() {
        if keywords
            .iter()
            .any(|kw| keyword_matches(&lowered, &kw.to_lowercase(), mode))
        {
            tags.insert(category.to_string());
        }
    }

    if tags.is_empty() {
        tags.insert(UNCATEGORIZED.to_string());
    }
    tags
}

fn keyword_matches(haystack: &str, keyword: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => haystack.contains(keyword),
        MatchMode::WordBoundary => haystack.match_indices(keyword).any(|(start, m)| {
            let before = haystack[..start].chars().next_back();
            let after = haystack[start + m.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        }),
    }
}

/// A category table bundled with its match mode.
#[derive(Debug, Clone, Default)]
pub struct Tagger {
    table: CategoryTable,
    mode: MatchMode,
}

impl Tagger {
    pub fn new(table: CategoryTable, mode: MatchMode) -> Self {
        Self { table, mode }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Tag a cleaned chunk.
    pub fn tag(&self, text: &str) -> BTreeSet<String> {
        tag_with_mode(text, &self.table, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_multi_category_match() {
        let tags = tag("Jazz at the street festival", &CategoryTable::default());
        assert!(tags.contains("music"));
        assert!(tags.contains("festival"));
    }

    #[test]
    fn test_case_insensitive() {
        let tags = tag("YOGA IN THE PARK", &CategoryTable::default());
        assert_eq!(tags, set(&["wellness"]));
    }

    #[test]
    fn test_uncategorized_sentinel() {
        let tags = tag("Parking garage opening hours", &CategoryTable::default());
        assert_eq!(tags, set(&[UNCATEGORIZED]));
    }

    #[test]
    fn test_empty_table_is_uncategorized() {
        assert_eq!(tag("jazz", &CategoryTable::empty()), set(&[UNCATEGORIZED]));
    }

    #[test]
    fn test_substring_matches_inside_words() {
        let table = CategoryTable::empty().with_category("family", ["art"]);
        assert_eq!(tag("a smart move", &table), set(&["family"]));
    }

    #[test]
    fn test_word_boundary_rejects_embedded_keyword() {
        let table = CategoryTable::empty().with_category("family", ["art"]);
        assert_eq!(
            tag_with_mode("a smart move", &table, MatchMode::WordBoundary),
            set(&[UNCATEGORIZED])
        );
        assert_eq!(
            tag_with_mode("street art, smart move", &table, MatchMode::WordBoundary),
            set(&["family"])
        );
    }

    #[test]
    fn test_word_boundary_multi_word_keyword() {
        let table = CategoryTable::empty().with_category("festival", ["block party"]);
        assert_eq!(
            tag_with_mode("Join the block party!", &table, MatchMode::WordBoundary),
            set(&["festival"])
        );
    }

    #[test]
    fn test_alternate_table_does_not_interfere() {
        let table = CategoryTable::empty().with_category("transit", ["muni", "bart"]);
        assert_eq!(tag("Take BART to the jazz show", &table), set(&["transit"]));
        assert!(tag("Take BART to the jazz show", &CategoryTable::default()).contains("music"));
    }

    #[test]
    fn test_tagger_uses_mode() {
        let table = CategoryTable::empty().with_category("wellness", ["run"]);
        let strict = Tagger::new(table.clone(), MatchMode::WordBoundary);
        let loose = Tagger::new(table, MatchMode::Substring);
        assert_eq!(strict.tag("brunch"), set(&[UNCATEGORIZED]));
        assert_eq!(loose.tag("brunch"), set(&["wellness"]));
    }

    #[test]
    fn test_match_mode_parse() {
        assert_eq!("substring".parse::<MatchMode>(), Ok(MatchMode::Substring));
        assert_eq!("word-boundary".parse::<MatchMode>(), Ok(MatchMode::WordBoundary));
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }

    #[test]
    fn test_validate_rejects_reserved_name() {
        let table = CategoryTable::empty().with_category(UNCATEGORIZED, ["x"]);
        assert!(table.validate().is_err());
        assert!(CategoryTable::default().validate().is_ok());
    }

    #[test]
    fn test_table_from_yaml() {
        let table: CategoryTable =
            serde_yaml::from_str("music: [jazz, gig]\nfood: [tacos]\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(tag("Tacos and a gig", &table), set(&["food", "music"]));
    }

    proptest! {
        #[test]
        fn tags_never_empty(text in "\\PC{0,200}") {
            prop_assert!(!tag(&text, &CategoryTable::default()).is_empty());
        }

        #[test]
        fn sentinel_iff_no_keyword(text in "[a-z ]{0,200}") {
            let table = CategoryTable::default();
            let lowered = text.to_lowercase();
            let any_hit = table
                .iter()
                .any(|(_, kws)| kws.iter().any(|k| lowered.contains(k.as_str())));
            let tags = tag(&text, &table);
            prop_assert_eq!(tags.contains(UNCATEGORIZED), !any_hit);
            if tags.contains(UNCATEGORIZED) {
                prop_assert_eq!(tags.len(), 1);
            }
        }
    }
}
