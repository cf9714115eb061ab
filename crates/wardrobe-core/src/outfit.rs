use crate::api::WardrobeApi;
use crate::candidates::{self, SelectionLimits};
use crate::error::{Result, WardrobeError};
use crate::model::{CandidateSet, OutfitRecommendationResponse, OutfitRequest, RankedRecommendation};

/// Select candidates from `recommendations` (falling back to the catalog) and
/// ask the backend to score top/bottom pairs.
pub async fn recommend_outfits<A: WardrobeApi>(
    api: &A,
    recommendations: &[RankedRecommendation],
    limits: SelectionLimits,
) -> Result<OutfitRecommendationResponse> {
    let set = candidates::select(api, recommendations, limits).await?;
    score_candidates(api, &set).await
}

/// Post an explicit candidate set. Empty lists are rejected locally.
pub async fn score_candidates<A: WardrobeApi>(
    api: &A,
    set: &CandidateSet,
) -> Result<OutfitRecommendationResponse> {
    if !set.is_usable() {
        return Err(WardrobeError::InvalidInput(
            "Missing top or bottom item IDs".into(),
        ));
    }

    let request = OutfitRequest::from(set);
    let response = api.outfit_recommendations(&request).await.map_err(|e| match e {
        WardrobeError::Fetch(_) => e,
        other => WardrobeError::Fetch(format!("outfit recommendations failed: {other}")),
    })?;
    tracing::info!(
        outfits = response.outfits.len(),
        total = response.total_combinations,
        "outfits scored"
    );
    Ok(response)
}
