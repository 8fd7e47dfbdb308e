// src/content/filter.rs
//! Status, category and free-text predicates over an aggregated collection.
//!
//! All predicates are conjunctive and the output keeps input order; ordering
//! is decided later by the sort stage.

use crate::content::types::ContentItem;

/// Filter values that mean "no constraint" (compared case-insensitively).
pub const ALL_SENTINELS: &[&str] = &["", "all", "all categories", "all types"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => CategoryFilter::All,
            Some(s) if ALL_SENTINELS.iter().any(|a| a.eq_ignore_ascii_case(s)) => {
                CategoryFilter::All
            }
            Some(s) => CategoryFilter::Exact(s.to_string()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Exact(s) => Some(s),
        }
    }

    /// Exact, case-sensitive equality against the item's facet.
    pub fn matches(&self, facet: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(s) => s == facet,
        }
    }
}

/// Case-insensitive substring match over the item's search fields.
/// Only the empty query matches everything; whitespace is part of the needle.
pub fn matches_search<T: ContentItem>(item: &T, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|f| f.to_lowercase().contains(&needle))
}

/// Published AND category AND search.
pub fn filter_items<T: ContentItem>(items: &[T], query: &str, category: &CategoryFilter) -> Vec<T> {
    items
        .iter()
        .filter(|it| it.status().is_published())
        .filter(|it| category.matches(it.facet()))
        .filter(|it| matches_search(*it, query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::{Article, SourceId};
    use serde_json::json;

    fn article(title: &str, category: &str, status: &str) -> Article {
        let raw = json!({
            "id": title,
            "title": title,
            "category": category,
            "author": "Ada Moreno",
            "excerpt": "Notes from the bench",
            "status": status,
        });
        Article::from_raw(raw.as_object().unwrap(), SourceId::Seed)
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let a = article("Constitutional Law Reform", "Constitutional Law", "Published");
        for q in ["law", "LAW", "Law Reform", "", " law"] {
            assert!(matches_search(&a, q), "query {q:?} should match");
        }
        assert!(!matches_search(&a, "xyz123"));
    }

    #[test]
    fn query_whitespace_is_not_trimmed() {
        let a = article("Constitutional Law Reform", "Constitutional Law", "Published");
        assert!(!matches_search(&a, "   "));
        assert!(!matches_search(&a, "reform "));
        assert!(matches_search(&a, "law reform"));
    }

    #[test]
    fn search_covers_author_and_excerpt() {
        let a = article("Title", "Opinion", "Published");
        assert!(matches_search(&a, "moreno"));
        assert!(matches_search(&a, "BENCH"));
    }

    #[test]
    fn category_is_exact_with_sentinels() {
        let a = article("T", "Human Rights", "Published");
        let items = vec![a];
        let none = filter_items(&items, "", &CategoryFilter::parse(Some("Constitutional Law")));
        assert!(none.is_empty());
        for f in ["Human Rights", "All Categories", "all", ""] {
            let out = filter_items(&items, "", &CategoryFilter::parse(Some(f)));
            assert_eq!(out.len(), 1, "filter {f:?}");
        }
        assert!(filter_items(&items, "", &CategoryFilter::parse(Some("human rights"))).is_empty());
    }

    #[test]
    fn drafts_are_excluded_and_order_kept() {
        let items = vec![
            article("b", "X", "Published"),
            article("hidden", "X", "Draft"),
            article("a", "X", "Published"),
            article("odd", "X", "Archived"),
        ];
        let out = filter_items(&items, "", &CategoryFilter::All);
        let titles: Vec<&str> = out.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
    }
}
