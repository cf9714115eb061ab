//! Outfit candidate selection.
//!
//! Ranked recommendations are consumed first, in the order the backend
//! ranked them. If either side is still under its cap, the wardrobe
//! catalog is scanned linearly to top it up. Ids picked in the ranked phase
//! are not excluded from the fallback scan, so an id can appear twice.

use crate::api::WardrobeApi;
use crate::catalog::CatalogStore;
use crate::config::CandidatesConfig;
use crate::error::{Result, WardrobeError};
use crate::model::{CandidateSet, RankedRecommendation, WardrobeItem};

pub const TOP_KEYWORDS: &[&str] = &[
    "shirt",
    "tshirt",
    "t-shirt",
    "blouse",
    "top",
    "sweater",
    "sweatshirt",
    "hoodie",
    "jacket",
    "blazer",
    "waistcoat",
    "kurta",
    "kurti",
    "tunic",
    "nehru",
    "romper",
];

pub const BOTTOM_KEYWORDS: &[&str] = &[
    "pant",
    "jean",
    "trouser",
    "short",
    "skirt",
    "legging",
    "churidar",
    "capri",
    "track pant",
    "rain trouser",
    "tights",
];

/// Default cap for each side of a [`CandidateSet`].
pub const DEFAULT_CAP: usize = 5;
/// Default catalog size for the fallback scan.
pub const DEFAULT_FALLBACK_LIMIT: usize = 200;

fn contains_keyword(label: &str, keywords: &[&str]) -> bool {
    let label = label.to_lowercase();
    keywords.iter().any(|k| label.contains(k))
}

pub fn is_top(label: &str) -> bool {
    contains_keyword(label, TOP_KEYWORDS)
}

pub fn is_bottom(label: &str) -> bool {
    contains_keyword(label, BOTTOM_KEYWORDS)
}

/// Per-side caps plus the fallback catalog bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    pub top_cap: usize,
    pub bottom_cap: usize,
    pub fallback_limit: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            top_cap: DEFAULT_CAP,
            bottom_cap: DEFAULT_CAP,
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
        }
    }
}

impl From<&CandidatesConfig> for SelectionLimits {
    fn from(config: &CandidatesConfig) -> Self {
        Self {
            top_cap: config.top_cap,
            bottom_cap: config.bottom_cap,
            fallback_limit: config.fallback_limit,
        }
    }
}

/// Ranked phase. A label that reads as both top and bottom counts as a top.
pub fn collect_ranked(
    recommendations: &[RankedRecommendation],
    top_cap: usize,
    bottom_cap: usize,
) -> CandidateSet {
    let mut set = CandidateSet::default();

    for rec in recommendations {
        let (ids, cap) = if is_top(&rec.item) {
            (&mut set.top_ids, top_cap)
        } else if is_bottom(&rec.item) {
            (&mut set.bottom_ids, bottom_cap)
        } else {
            continue;
        };

        for item in &rec.wardrobe_items {
            if ids.len() >= cap {
                break;
            }
            ids.push(item.id.clone());
        }
    }

    set
}

/// Fallback phase. Tops and bottoms are checked independently, so one catalog
/// item may fill a slot on each side.
pub fn fill_from_catalog(
    set: &mut CandidateSet,
    catalog: &[WardrobeItem],
    top_cap: usize,
    bottom_cap: usize,
) {
    for item in catalog {
        if set.is_full(top_cap, bottom_cap) {
            break;
        }
        if set.top_ids.len() < top_cap && is_top(&item.class_name) {
            set.top_ids.push(item.id.clone());
        }
        if set.bottom_ids.len() < bottom_cap && is_bottom(&item.class_name) {
            set.bottom_ids.push(item.id.clone());
        }
    }
}

/// Build a candidate set, consulting the catalog only when the ranked
/// recommendations leave a side under its cap.
pub async fn select<A: WardrobeApi>(
    api: &A,
    recommendations: &[RankedRecommendation],
    limits: SelectionLimits,
) -> Result<CandidateSet> {
    let mut set = collect_ranked(recommendations, limits.top_cap, limits.bottom_cap);
    tracing::debug!(
        tops = set.top_ids.len(),
        bottoms = set.bottom_ids.len(),
        "ranked candidates collected"
    );

    if !set.is_full(limits.top_cap, limits.bottom_cap) {
        let catalog = CatalogStore::load(api, limits.fallback_limit).await?;
        fill_from_catalog(
            &mut set,
            catalog.items(),
            limits.top_cap,
            limits.bottom_cap,
        );
        tracing::debug!(
            tops = set.top_ids.len(),
            bottoms = set.bottom_ids.len(),
            scanned = catalog.len(),
            "fallback scan finished"
        );
    }

    if !set.is_usable() {
        return Err(WardrobeError::InsufficientCandidates);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockApi;

    fn items(prefix: &str, class_name: &str, n: usize) -> Vec<WardrobeItem> {
        (1..=n)
            .map(|i| WardrobeItem::new(format!("{prefix}{i}"), class_name))
            .collect()
    }

    #[test]
    fn test_classifier() {
        assert!(is_top("T-Shirt"));
        assert!(is_top("Nehru Jackets"));
        assert!(is_top("Sweatshirt"));
        assert!(is_bottom("Track Pants"));
        assert!(is_bottom("JEANS"));
        assert!(is_bottom("Shorts"));
        assert!(!is_top("Shorts"));
        assert!(!is_top("Saree"));
        assert!(!is_bottom("Saree"));
        assert!(!is_bottom("Watches"));
    }

    #[test]
    fn test_label_matching_both_counts_as_top_in_ranked_phase() {
        // "Shirt Skirt" reads as both; the ranked phase favors tops.
        let recs = vec![RankedRecommendation::new("Shirt Skirt", 7.0)
            .with_items(items("x", "Shirt Skirt", 2))];
        let set = collect_ranked(&recs, 5, 5);
        assert_eq!(set.top_ids, vec!["x1", "x2"]);
        assert!(set.bottom_ids.is_empty());
    }

    #[test]
    fn test_ranked_blazer_capped_in_order() {
        let recs =
            vec![RankedRecommendation::new("Blazer", 8.5).with_items(items("bz", "Blazer", 6))];
        let set = collect_ranked(&recs, 5, 5);
        assert_eq!(set.top_ids, vec!["bz1", "bz2", "bz3", "bz4", "bz5"]);
        assert!(set.bottom_ids.is_empty());
    }

    #[test]
    fn test_ranked_order_across_recommendations() {
        let recs = vec![
            RankedRecommendation::new("Jeans", 9.0).with_items(items("j", "Jeans", 2)),
            RankedRecommendation::new("Hoodie", 8.0).with_items(items("h", "Hoodie", 3)),
            RankedRecommendation::new("Watch", 7.5).with_items(items("w", "Watch", 3)),
            RankedRecommendation::new("Shirt", 7.0).with_items(items("s", "Shirt", 4)),
            RankedRecommendation::new("Skirt", 6.0).with_items(items("k", "Skirt", 4)),
        ];
        let set = collect_ranked(&recs, 5, 5);
        assert_eq!(set.top_ids, vec!["h1", "h2", "h3", "s1", "s2"]);
        assert_eq!(set.bottom_ids, vec!["j1", "j2", "k1", "k2", "k3"]);
    }

    #[test]
    fn test_fallback_fills_both_sides() {
        let mut catalog = items("s", "Shirt", 3);
        catalog.extend(items("j", "Jeans", 2));
        catalog.push(WardrobeItem::new("w1", "Watch"));

        let mut set = CandidateSet::default();
        fill_from_catalog(&mut set, &catalog, 5, 5);
        assert_eq!(set.top_ids, vec!["s1", "s2", "s3"]);
        assert_eq!(set.bottom_ids, vec!["j1", "j2"]);
    }

    #[test]
    fn test_fallback_does_not_dedup_ranked_picks() {
        let shirts = items("s", "Shirt", 2);
        let recs = vec![RankedRecommendation::new("Shirt", 9.0).with_items(shirts.clone())];
        let mut set = collect_ranked(&recs, 5, 5);
        fill_from_catalog(&mut set, &shirts, 5, 5);
        assert_eq!(set.top_ids, vec!["s1", "s2", "s1", "s2"]);
    }

    #[test]
    fn test_fallback_item_can_fill_both_sides() {
        let catalog = vec![WardrobeItem::new("combo", "Shirt Shorts Set")];
        let mut set = CandidateSet::default();
        fill_from_catalog(&mut set, &catalog, 5, 5);
        assert_eq!(set.top_ids, vec!["combo"]);
        assert_eq!(set.bottom_ids, vec!["combo"]);
    }

    #[test]
    fn test_fallback_respects_caps() {
        let catalog = items("t", "Tshirt", 10);
        let mut set = CandidateSet::default();
        fill_from_catalog(&mut set, &catalog, 3, 3);
        assert_eq!(set.top_ids.len(), 3);
        assert!(set.bottom_ids.is_empty());
    }

    #[tokio::test]
    async fn test_select_fallback_only() {
        let mut catalog = items("s", "Shirt", 3);
        catalog.extend(items("j", "Jeans", 2));
        let api = MockApi::new().with_catalog(catalog);

        let set = select(&api, &[], SelectionLimits::default()).await.unwrap();
        assert_eq!(set.top_ids.len(), 3);
        assert_eq!(set.bottom_ids.len(), 2);
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_select_skips_catalog_when_full() {
        let recs = vec![
            RankedRecommendation::new("Blazer", 8.5).with_items(items("b", "Blazer", 6)),
            RankedRecommendation::new("Trousers", 8.0).with_items(items("t", "Trousers", 5)),
        ];
        let api = MockApi::new();
        let set = select(&api, &recs, SelectionLimits::default()).await.unwrap();
        assert_eq!(set.top_ids, vec!["b1", "b2", "b3", "b4", "b5"]);
        assert_eq!(set.bottom_ids.len(), 5);
        assert_eq!(api.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_select_fallback_uses_configured_limit() {
        let mut catalog = items("s", "Shirt", 4);
        catalog.extend(items("j", "Jeans", 4));
        let api = MockApi::new().with_catalog(catalog);
        let limits = SelectionLimits {
            fallback_limit: 4,
            ..Default::default()
        };
        // Only the first 4 (all shirts) are fetched, so no bottoms.
        let err = select(&api, &[], limits).await.unwrap_err();
        assert!(matches!(err, WardrobeError::InsufficientCandidates));
    }

    #[tokio::test]
    async fn test_select_insufficient_when_no_bottoms() {
        let api = MockApi::new().with_catalog(items("s", "Shirt", 3));
        let err = select(&api, &[], SelectionLimits::default())
            .await
            .unwrap_err();
        assert!(matches!(err, WardrobeError::InsufficientCandidates));
    }

    #[tokio::test]
    async fn test_select_propagates_catalog_failure() {
        let api = MockApi::new().failing_catalog();
        let err = select(&api, &[], SelectionLimits::default())
            .await
            .unwrap_err();
        assert!(matches!(err, WardrobeError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_select_never_exceeds_caps() {
        let recs = vec![
            RankedRecommendation::new("Hoodie", 9.0).with_items(items("h", "Hoodie", 4)),
            RankedRecommendation::new("Leggings", 8.0).with_items(items("l", "Leggings", 1)),
        ];
        let mut catalog = items("s", "Shirt", 7);
        catalog.extend(items("p", "Pants", 7));
        let api = MockApi::new().with_catalog(catalog);

        for (top_cap, bottom_cap) in [(1, 1), (2, 6), (5, 5), (8, 3)] {
            let limits = SelectionLimits {
                top_cap,
                bottom_cap,
                ..Default::default()
            };
            let set = select(&api, &recs, limits).await.unwrap();
            assert!(set.top_ids.len() <= top_cap);
            assert!(set.bottom_ids.len() <= bottom_cap);
        }
    }

    #[test]
    fn test_limits_from_config() {
        let config = CandidatesConfig {
            top_cap: 3,
            bottom_cap: 2,
            fallback_limit: 50,
        };
        let limits = SelectionLimits::from(&config);
        assert_eq!(limits.top_cap, 3);
        assert_eq!(limits.bottom_cap, 2);
        assert_eq!(limits.fallback_limit, 50);
    }
}
