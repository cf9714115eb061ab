use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::WardrobeApi;
use crate::config::ApiConfig;
use crate::error::{Result, WardrobeError};
use crate::model::*;

/// reqwest-backed client for the wardrobe backend.
pub struct HttpWardrobeApi {
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpWardrobeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpWardrobeApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpWardrobeApi {
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| WardrobeError::Config(format!("invalid api.base_url '{base_url}': {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the stored upload for an item.
    pub fn image_url(&self, filename: &str) -> String {
        format!("{}/image/{}", self.base_url, filename)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_image<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<T> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(guess_mime(filename))?;
        let form = Form::new().part("file", part);

        let resp = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|e| WardrobeError::Fetch(format!("{what} request failed: {e}")))?;

        read_json(resp, what).await
    }
}

impl WardrobeApi for HttpWardrobeApi {
    async fn list_wardrobe(&self, limit: usize) -> Result<Vec<WardrobeItem>> {
        tracing::debug!(limit, "GET /wardrobe");
        let resp = self
            .client
            .get(format!("{}/wardrobe?limit={limit}", self.base_url))
            .send()
            .await
            .map_err(|e| WardrobeError::Fetch(format!("wardrobe listing request failed: {e}")))?;

        read_json(resp, "wardrobe listing").await
    }

    async fn get_item(&self, id: &str) -> Result<WardrobeItem> {
        tracing::debug!(id, "GET /item");
        let mut url = Url::parse(&self.url("/item/"))
            .map_err(|e| WardrobeError::Config(format!("invalid api.base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| WardrobeError::Config("api.base_url cannot be a base".into()))?
            .pop_if_empty()
            .push(id);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WardrobeError::Fetch(format!("item request failed: {e}")))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(WardrobeError::NotFound(format!("item {id}")));
        }
        read_json(resp, "item lookup").await
    }

    async fn upload_item(&self, filename: &str, bytes: Vec<u8>) -> Result<WardrobeItem> {
        tracing::debug!(filename, size = bytes.len(), "POST /upload");
        self.post_image("/upload", "upload", filename, bytes).await
    }

    async fn face_recommendations(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<FaceRecommendationResponse> {
        tracing::debug!(filename, size = bytes.len(), "POST /face-recommendations");
        self.post_image("/face-recommendations", "face analysis", filename, bytes)
            .await
    }

    async fn web_recommendations(&self, item_names: &[String]) -> Result<WebRecommendationResponse> {
        tracing::debug!(?item_names, "POST /web-recommendations");
        let body = WebRecommendationRequest {
            item_names: item_names.to_vec(),
        };
        let resp = self
            .client
            .post(self.url("/web-recommendations"))
            .json(&body)
            .send()
            .await
            .map_err(|e| WardrobeError::Fetch(format!("web recommendations request failed: {e}")))?;

        read_json(resp, "web recommendations").await
    }

    async fn outfit_recommendations(
        &self,
        request: &OutfitRequest,
    ) -> Result<OutfitRecommendationResponse> {
        tracing::debug!(
            tops = request.top_item_ids.len(),
            bottoms = request.bottom_item_ids.len(),
            "POST /outfit-recommendations"
        );
        let resp = self
            .client
            .post(self.url("/outfit-recommendations"))
            .json(request)
            .send()
            .await
            .map_err(|e| WardrobeError::Fetch(format!("outfit request failed: {e}")))?;

        read_json(resp, "outfit recommendations").await
    }

    async fn weather_recommendation(
        &self,
        city: &str,
        openweather_key: Option<&str>,
    ) -> Result<WeatherRecommendation> {
        tracing::debug!(city, "GET /recommend");
        let mut params = vec![("city", city)];
        if let Some(key) = openweather_key {
            params.push(("openweather_key", key));
        }
        let url = Url::parse_with_params(&self.url("/recommend"), &params)
            .map_err(|e| WardrobeError::Config(format!("invalid api.base_url: {e}")))?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WardrobeError::Fetch(format!("weather request failed: {e}")))?;

        read_json(resp, "weather recommendation").await
    }
}

/// Turn a non-2xx response into `Fetch`, preferring the backend's `detail` message.
async fn read_json<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(WardrobeError::Fetch(format!(
            "{what} failed ({status}): {}",
            error_detail(&text, status)
        )));
    }

    resp.json()
        .await
        .map_err(|e| WardrobeError::Fetch(format!("{what} response parse error: {e}")))
}

fn error_detail(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["detail"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        })
}

fn guess_mime(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
