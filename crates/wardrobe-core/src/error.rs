use thiserror::Error;

#[derive(Debug, Error)]
pub enum WardrobeError {
    /// A primary data load (catalog, face analysis, outfit scoring) failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Need at least one top and one bottom item in your wardrobe; upload more items and try again")]
    InsufficientCandidates,

    /// Supplementary shopping lookup failed. Logged by the lazy fetch cache,
    /// never handed back to callers.
    #[error("Secondary fetch for '{key}' failed: {message}")]
    SecondaryFetch { key: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl WardrobeError {
    /// Returns `true` for failures on the primary path that the view layer
    /// must show as a blocking message.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Self::SecondaryFetch { .. })
    }
}

pub type Result<T> = std::result::Result<T, WardrobeError>;
