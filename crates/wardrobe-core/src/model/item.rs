use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A classified clothing item as stored by the backend. Immutable on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardrobeItem {
    pub id: String,
    pub filename: String,
    /// Category label produced by the classifier (free text, e.g. "Jeans").
    pub class_name: String,
    #[serde(default)]
    pub confidence: f32,
    /// Dominant color as `#RRGGBB`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub color_hex: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub thickness: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl WardrobeItem {
    pub fn new(id: impl Into<String>, class_name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            filename: format!("{id}.jpg"),
            id,
            class_name: class_name.into(),
            confidence: 1.0,
            color_hex: String::new(),
            thickness: String::new(),
            created_at: None,
            meta: None,
        }
    }

    pub fn with_color(mut self, color_hex: impl Into<String>) -> Self {
        self.color_hex = color_hex.into();
        self
    }

    pub fn with_thickness(mut self, thickness: impl Into<String>) -> Self {
        self.thickness = thickness.into();
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Lowercased category label, the form used by facets and the category filter.
    pub fn category(&self) -> String {
        self.class_name.to_lowercase()
    }
}

/// The backend stores nullable columns; treat `null` like a missing field.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
