mod http;

pub use http::HttpWardrobeApi;

use crate::error::Result;
use crate::model::*;

/// The backend contract. `HttpWardrobeApi` talks to the real service; tests
/// substitute in-memory implementations.
pub trait WardrobeApi: Send + Sync {
    /// `GET /wardrobe?limit=N`, newest first.
    fn list_wardrobe(
        &self,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<WardrobeItem>>> + Send;

    /// `GET /item/{id}`
    fn get_item(&self, id: &str) -> impl std::future::Future<Output = Result<WardrobeItem>> + Send;

    /// `POST /upload` with the image as multipart field `file`.
    fn upload_item(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<WardrobeItem>> + Send;

    /// `POST /face-recommendations` with a face photo as multipart field `file`.
    fn face_recommendations(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<FaceRecommendationResponse>> + Send;

    /// `POST /web-recommendations`
    fn web_recommendations(
        &self,
        item_names: &[String],
    ) -> impl std::future::Future<Output = Result<WebRecommendationResponse>> + Send;

    /// `POST /outfit-recommendations`
    fn outfit_recommendations(
        &self,
        request: &OutfitRequest,
    ) -> impl std::future::Future<Output = Result<OutfitRecommendationResponse>> + Send;

    /// `GET /recommend?city=&openweather_key=`
    fn weather_recommendation(
        &self,
        city: &str,
        openweather_key: Option<&str>,
    ) -> impl std::future::Future<Output = Result<WeatherRecommendation>> + Send;
}
