use std::path::PathBuf;

use wardrobe_core::model::*;

/// Actions the UI sends to the async worker task.
#[derive(Debug)]
pub enum AsyncAction {
    /// Fetch the wardrobe listing.
    LoadWardrobe { limit: usize },
    /// Upload a face photo and fetch ranked recommendations.
    AnalyzeFace { path: PathBuf },
    /// Select candidates and score outfit pairs.
    RecommendOutfits {
        recommendations: Vec<RankedRecommendation>,
    },
}

/// Results the async worker sends back to the UI.
#[derive(Debug)]
pub enum AsyncResult {
    Wardrobe(Vec<WardrobeItem>),
    Face(Box<FaceRecommendationResponse>),
    Outfits(OutfitRecommendationResponse),
    /// An error occurred during an async operation.
    Error(String),
}
