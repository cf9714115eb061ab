use serde::{Deserialize, Serialize};

use super::item::WardrobeItem;

/// Bounded, ordered top/bottom ids handed to the outfit-compatibility endpoint.
///
/// Ids are not deduplicated across the two lists, nor between the ranked and
/// fallback selection phases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSet {
    pub top_ids: Vec<String>,
    pub bottom_ids: Vec<String>,
}

impl CandidateSet {
    pub fn is_full(&self, top_cap: usize, bottom_cap: usize) -> bool {
        self.top_ids.len() >= top_cap && self.bottom_ids.len() >= bottom_cap
    }

    /// Both sides have at least one id, enough to ask for outfit pairs.
    pub fn is_usable(&self) -> bool {
        !self.top_ids.is_empty() && !self.bottom_ids.is_empty()
    }
}

/// Request body of `POST /outfit-recommendations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitRequest {
    pub top_item_ids: Vec<String>,
    pub bottom_item_ids: Vec<String>,
}

impl From<&CandidateSet> for OutfitRequest {
    fn from(set: &CandidateSet) -> Self {
        Self {
            top_item_ids: set.top_ids.clone(),
            bottom_item_ids: set.bottom_ids.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    pub top: WardrobeItem,
    pub bottom: WardrobeItem,
    /// Compatibility in `[0, 1]`.
    pub compatibility_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitRecommendationResponse {
    #[serde(default)]
    pub outfits: Vec<Outfit>,
    #[serde(default)]
    pub total_combinations: u32,
}

/// Coarse compatibility band used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompatibilityBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl CompatibilityBand {
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            Self::Excellent
        } else if score >= 0.6 {
            Self::Good
        } else if score >= 0.4 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl std::fmt::Display for CompatibilityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
        }
    }
}
