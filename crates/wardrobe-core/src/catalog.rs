//! In-memory wardrobe catalog: loaded once, then faceted and filtered locally.

use std::collections::HashSet;

use serde::Serialize;

use crate::api::WardrobeApi;
use crate::error::{Result, WardrobeError};
use crate::model::WardrobeItem;

/// Facet value that disables a predicate.
pub const ALL: &str = "all";

/// Filterable dimensions derived from the loaded items. Each list starts with [`ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: Vec<String>,
    pub colors: Vec<String>,
    pub thicknesses: Vec<String>,
}

/// The four conjunctive predicates of the wardrobe filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub query: String,
    pub category: String,
    pub color: String,
    pub thickness: String,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL.to_string(),
            color: ALL.to_string(),
            thickness: ALL.to_string(),
        }
    }
}

impl FilterQuery {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_thickness(mut self, thickness: impl Into<String>) -> Self {
        self.thickness = thickness.into();
        self
    }

    /// True when any predicate narrows the result.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
            || self.category != ALL
            || self.color != ALL
            || self.thickness != ALL
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, item: &WardrobeItem) -> bool {
        let matches_search = if self.query.is_empty() {
            true
        } else {
            let needle = self.query.to_lowercase();
            item.class_name.to_lowercase().contains(&needle)
                || item.color_hex.to_lowercase().contains(&needle)
        };

        let matches_category =
            self.category == ALL || item.category() == self.category.to_lowercase();

        let matches_color =
            self.color == ALL || item.color_hex.to_lowercase() == self.color.to_lowercase();

        let matches_thickness = self.thickness == ALL || item.thickness == self.thickness;

        matches_search && matches_category && matches_color && matches_thickness
    }
}

/// Owns the wardrobe listing for one session. Never mutated after load.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    items: Vec<WardrobeItem>,
}

impl CatalogStore {
    pub fn new(items: Vec<WardrobeItem>) -> Self {
        Self { items }
    }

    /// Fetch the listing once. Any failure is a blocking `Fetch` error.
    pub async fn load<A: WardrobeApi>(api: &A, limit: usize) -> Result<Self> {
        let items = api.list_wardrobe(limit).await.map_err(|e| match e {
            WardrobeError::Fetch(_) => e,
            other => WardrobeError::Fetch(format!("failed to load wardrobe: {other}")),
        })?;
        tracing::info!(count = items.len(), limit, "wardrobe loaded");
        Ok(Self::new(items))
    }

    pub fn items(&self) -> &[WardrobeItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WardrobeItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn facets(&self) -> Facets {
        let mut categories: Vec<String> = unique(self.items.iter().map(|i| i.category()));
        categories.sort();
        categories.insert(0, ALL.to_string());

        let mut colors = unique(self.items.iter().map(|i| i.color_hex.clone()));
        colors.insert(0, ALL.to_string());

        let mut thicknesses = unique(
            self.items
                .iter()
                .filter(|i| !i.thickness.is_empty())
                .map(|i| i.thickness.clone()),
        );
        thicknesses.insert(0, ALL.to_string());

        Facets {
            categories,
            colors,
            thicknesses,
        }
    }

    pub fn filter(&self, query: &FilterQuery) -> Vec<WardrobeItem> {
        filter_items(&self.items, query)
    }
}

/// Pure filter over any item slice, preserving order.
pub fn filter_items(items: &[WardrobeItem], query: &FilterQuery) -> Vec<WardrobeItem> {
    items.iter().filter(|i| query.matches(i)).cloned().collect()
}

/// Deduplicate keeping first-seen order.
fn unique(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockApi;

    fn sample() -> Vec<WardrobeItem> {
        vec![
            WardrobeItem::new("1", "Shirt")
                .with_color("#FF0000")
                .with_thickness("Lightweight"),
            WardrobeItem::new("2", "Jeans")
                .with_color("#1F2A44")
                .with_thickness("Midweight"),
            WardrobeItem::new("3", "shirt")
                .with_color("#ffffff")
                .with_thickness("Lightweight"),
            WardrobeItem::new("4", "Blazer").with_color("#000000"),
            WardrobeItem::new("5", "Red Dress")
                .with_color("#FF0000")
                .with_thickness("Heavyweight"),
        ]
    }

    fn ids(items: &[WardrobeItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_facets() {
        let store = CatalogStore::new(sample());
        let facets = store.facets();
        assert_eq!(
            facets.categories,
            vec!["all", "blazer", "jeans", "red dress", "shirt"]
        );
        assert_eq!(
            facets.colors,
            vec!["all", "#FF0000", "#1F2A44", "#ffffff", "#000000"]
        );
        // Blazer has no thickness and is skipped
        assert_eq!(
            facets.thicknesses,
            vec!["all", "Lightweight", "Midweight", "Heavyweight"]
        );
    }

    #[test]
    fn test_facets_empty_catalog() {
        let facets = CatalogStore::default().facets();
        assert_eq!(facets.categories, vec!["all"]);
        assert_eq!(facets.colors, vec!["all"]);
        assert_eq!(facets.thicknesses, vec!["all"]);
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let store = CatalogStore::new(sample());
        assert_eq!(store.filter(&FilterQuery::default()).len(), 5);
        assert!(!FilterQuery::default().is_active());
    }

    #[test]
    fn test_query_matches_class_name_case_insensitive() {
        let store = CatalogStore::new(sample());
        let result = store.filter(&FilterQuery::default().with_query("SHIRT"));
        assert_eq!(ids(&result), vec!["1", "3"]);
    }

    #[test]
    fn test_query_matches_hex_substring() {
        let store = CatalogStore::new(sample());
        let result = store.filter(&FilterQuery::default().with_query("ff"));
        assert_eq!(ids(&result), vec!["1", "3", "5"]);
    }

    #[test]
    fn test_query_red_does_not_match_hex_red() {
        // Only the literal label/hex is searched, never color names.
        let store = CatalogStore::new(vec![
            WardrobeItem::new("r", "Shirt").with_color("#FF0000"),
            WardrobeItem::new("d", "Red Dress").with_color("#00FF00"),
        ]);
        let result = store.filter(&FilterQuery::default().with_query("red"));
        assert_eq!(ids(&result), vec!["d"]);
    }

    #[test]
    fn test_category_filter_lowercases() {
        let store = CatalogStore::new(sample());
        let result = store.filter(&FilterQuery::default().with_category("shirt"));
        assert_eq!(ids(&result), vec!["1", "3"]);
        let result = store.filter(&FilterQuery::default().with_category("Shirt"));
        assert_eq!(ids(&result), vec!["1", "3"]);
    }

    #[test]
    fn test_color_filter_case_insensitive() {
        let store = CatalogStore::new(sample());
        let result = store.filter(&FilterQuery::default().with_color("#FFFFFF"));
        assert_eq!(ids(&result), vec!["3"]);
    }

    #[test]
    fn test_thickness_filter_exact() {
        let store = CatalogStore::new(sample());
        let result = store.filter(&FilterQuery::default().with_thickness("Lightweight"));
        assert_eq!(ids(&result), vec!["1", "3"]);
        let result = store.filter(&FilterQuery::default().with_thickness("lightweight"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let store = CatalogStore::new(sample());
        let query = FilterQuery::default()
            .with_query("shirt")
            .with_color("#ff0000")
            .with_thickness("Lightweight");
        assert!(query.is_active());
        assert_eq!(ids(&store.filter(&query)), vec!["1"]);
    }

    #[test]
    fn test_filter_idempotent() {
        let items = sample();
        let queries = [
            FilterQuery::default(),
            FilterQuery::default().with_query("e"),
            FilterQuery::default().with_category("shirt"),
            FilterQuery::default().with_color("#FF0000"),
            FilterQuery::default()
                .with_query("r")
                .with_thickness("Heavyweight"),
            FilterQuery::default().with_query("nothing-matches"),
        ];
        for query in &queries {
            let once = filter_items(&items, query);
            let twice = filter_items(&once, query);
            assert_eq!(once, twice, "filter not idempotent for {query:?}");
        }
    }

    #[test]
    fn test_filter_does_not_mutate_store() {
        let store = CatalogStore::new(sample());
        let _ = store.filter(&FilterQuery::default().with_query("jeans"));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_clear_resets_predicates() {
        let mut query = FilterQuery::default().with_query("x").with_color("#000000");
        query.clear();
        assert_eq!(query, FilterQuery::default());
    }

    #[tokio::test]
    async fn test_load_from_api() {
        let api = MockApi::new().with_catalog(sample());
        let store = CatalogStore::load(&api, 200).await.unwrap();
        assert_eq!(store.len(), 5);
        assert_eq!(store.get("4").unwrap().class_name, "Blazer");
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_load_respects_limit() {
        let api = MockApi::new().with_catalog(sample());
        let store = CatalogStore::load(&api, 2).await.unwrap();
        assert_eq!(ids(store.items()), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_load_failure_is_fetch_error() {
        let api = MockApi::new().failing_catalog();
        let err = CatalogStore::load(&api, 200).await.unwrap_err();
        assert!(matches!(err, WardrobeError::Fetch(_)));
    }
}
