//! In-memory `WardrobeApi` used by unit tests. Counts calls so tests can
//! assert how many requests reached the "network".

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use crate::api::WardrobeApi;
use crate::error::{Result, WardrobeError};
use crate::model::*;

#[derive(Default)]
pub struct MockApi {
    catalog: Vec<WardrobeItem>,
    catalog_fails: bool,
    web: HashMap<String, Vec<ExternalProduct>>,
    web_fails: bool,
    /// When set, each web fetch waits for one permit before answering.
    web_gate: Option<Arc<Semaphore>>,
    face: Option<FaceRecommendationResponse>,
    list_calls: AtomicUsize,
    web_calls: AtomicUsize,
    web_requests: Mutex<Vec<Vec<String>>>,
    outfit_requests: Mutex<Vec<OutfitRequest>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, items: Vec<WardrobeItem>) -> Self {
        self.catalog = items;
        self
    }

    pub fn failing_catalog(mut self) -> Self {
        self.catalog_fails = true;
        self
    }

    pub fn with_products(mut self, key: &str, products: Vec<ExternalProduct>) -> Self {
        self.web.insert(key.to_string(), products);
        self
    }

    pub fn failing_web(mut self) -> Self {
        self.web_fails = true;
        self
    }

    /// Hold web fetches until the returned semaphore is given permits.
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.web_gate = Some(gate.clone());
        (self, gate)
    }

    pub fn with_face(mut self, response: FaceRecommendationResponse) -> Self {
        self.face = Some(response);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn web_calls(&self) -> usize {
        self.web_calls.load(Ordering::SeqCst)
    }

    pub fn web_requests(&self) -> Vec<Vec<String>> {
        self.web_requests.lock().unwrap().clone()
    }

    pub fn outfit_requests(&self) -> Vec<OutfitRequest> {
        self.outfit_requests.lock().unwrap().clone()
    }
}

pub fn product(title: &str) -> ExternalProduct {
    ExternalProduct {
        category: "test".into(),
        title: title.into(),
        link: Some(format!("https://shop.example/{title}")),
        price: "$19.99".into(),
        default_image: None,
        hover_image: None,
        colors: vec!["#000000".into()],
    }
}

pub fn face_response(recommendations: Vec<RankedRecommendation>) -> FaceRecommendationResponse {
    FaceRecommendationResponse {
        face_analysis: FaceAnalysis {
            skin_tone: SkinTone {
                rgb: vec![200.0, 160.0, 140.0],
                luminance: 0.6,
                undertone: 3.0,
                category: "medium".into(),
            },
            face_shape: "oval".into(),
            face_bbox: FaceBox {
                x: 0,
                y: 0,
                w: 100,
                h: 100,
            },
        },
        recommendations,
        style_tips: StyleTips::default(),
    }
}

impl WardrobeApi for MockApi {
    async fn list_wardrobe(&self, limit: usize) -> Result<Vec<WardrobeItem>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.catalog_fails {
            return Err(WardrobeError::Fetch("wardrobe listing failed (500)".into()));
        }
        Ok(self.catalog.iter().take(limit).cloned().collect())
    }

    async fn get_item(&self, id: &str) -> Result<WardrobeItem> {
        self.catalog
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| WardrobeError::NotFound(format!("item {id}")))
    }

    async fn upload_item(&self, filename: &str, _bytes: Vec<u8>) -> Result<WardrobeItem> {
        Ok(WardrobeItem::new("uploaded", "Shirt").with_filename(filename))
    }

    async fn face_recommendations(
        &self,
        _filename: &str,
        _bytes: Vec<u8>,
    ) -> Result<FaceRecommendationResponse> {
        self.face
            .clone()
            .ok_or_else(|| WardrobeError::Fetch("face analysis failed (400): No face detected".into()))
    }

    async fn web_recommendations(&self, item_names: &[String]) -> Result<WebRecommendationResponse> {
        self.web_calls.fetch_add(1, Ordering::SeqCst);
        self.web_requests.lock().unwrap().push(item_names.to_vec());

        if let Some(gate) = &self.web_gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        if self.web_fails {
            return Err(WardrobeError::Fetch("web recommendations failed (500)".into()));
        }

        let web_recommendations = item_names
            .iter()
            .filter_map(|name| self.web.get(name).map(|p| (name.clone(), p.clone())))
            .collect();
        Ok(WebRecommendationResponse {
            web_recommendations,
        })
    }

    async fn outfit_recommendations(
        &self,
        request: &OutfitRequest,
    ) -> Result<OutfitRecommendationResponse> {
        self.outfit_requests.lock().unwrap().push(request.clone());
        let top = self.get_item(&request.top_item_ids[0]).await?;
        let bottom = self.get_item(&request.bottom_item_ids[0]).await?;
        Ok(OutfitRecommendationResponse {
            outfits: vec![Outfit {
                top,
                bottom,
                compatibility_score: 0.82,
            }],
            total_combinations: (request.top_item_ids.len() * request.bottom_item_ids.len())
                as u32,
        })
    }

    async fn weather_recommendation(
        &self,
        _city: &str,
        _openweather_key: Option<&str>,
    ) -> Result<WeatherRecommendation> {
        Ok(WeatherRecommendation {
            weather: WeatherSnapshot {
                temp_c: 20.0,
                main: "Clear".into(),
            },
            suggestion: WeatherSuggestion::default(),
            recommendations: None,
            notes: Vec::new(),
        })
    }
}
