use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::item::WardrobeItem;

/// One clothing type suggested by face/style analysis, already ranked by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendation {
    /// Category label, e.g. "Blazer".
    pub item: String,
    #[serde(default)]
    pub thickness: String,
    /// Suitability score in `[0, 10]`.
    pub score: f32,
    #[serde(default)]
    pub wardrobe_items: Vec<WardrobeItem>,
}

impl RankedRecommendation {
    pub fn new(item: impl Into<String>, score: f32) -> Self {
        Self {
            item: item.into(),
            thickness: String::new(),
            score: score.clamp(0.0, 10.0),
            wardrobe_items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<WardrobeItem>) -> Self {
        self.wardrobe_items = items;
        self
    }

    pub fn with_thickness(mut self, thickness: impl Into<String>) -> Self {
        self.thickness = thickness.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinTone {
    #[serde(default)]
    pub rgb: Vec<f64>,
    pub luminance: f64,
    pub undertone: f64,
    pub category: String,
}

impl SkinTone {
    pub fn undertone_label(&self) -> &'static str {
        if self.undertone > 0.0 {
            "warm"
        } else {
            "cool"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceAnalysis {
    pub skin_tone: SkinTone,
    pub face_shape: String,
    pub face_bbox: FaceBox,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceShapeTips {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub necklines: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collars: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessories: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleTips {
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub face_shape_tips: FaceShapeTips,
}

/// Response of `POST /face-recommendations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRecommendationResponse {
    pub face_analysis: FaceAnalysis,
    #[serde(default)]
    pub recommendations: Vec<RankedRecommendation>,
    #[serde(default)]
    pub style_tips: StyleTips,
}

/// A product scraped from a shop. Passed through to the UI without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalProduct {
    #[serde(default)]
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub default_image: Option<String>,
    #[serde(default)]
    pub hover_image: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Request body of `POST /web-recommendations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebRecommendationRequest {
    pub item_names: Vec<String>,
}

/// Response of `POST /web-recommendations`, keyed by the requested item name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebRecommendationResponse {
    #[serde(default)]
    pub web_recommendations: HashMap<String, Vec<ExternalProduct>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temp_c: f64,
    pub main: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSuggestion {
    #[serde(default)]
    pub shirt: Option<WardrobeItem>,
    #[serde(default)]
    pub pant: Option<WardrobeItem>,
    #[serde(default)]
    pub outer: Option<WardrobeItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedItem {
    pub item: WardrobeItem,
    pub weather_score: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatedGroups {
    #[serde(default)]
    pub tops: Vec<RatedItem>,
    #[serde(default)]
    pub shorts: Vec<RatedItem>,
    #[serde(default)]
    pub bottoms: Vec<RatedItem>,
    #[serde(default)]
    pub outers: Vec<RatedItem>,
}

/// Response of `GET /recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecommendation {
    pub weather: WeatherSnapshot,
    #[serde(default)]
    pub suggestion: WeatherSuggestion,
    #[serde(default)]
    pub recommendations: Option<RatedGroups>,
    #[serde(default)]
    pub notes: Vec<String>,
}
