use crate::error::{Result, WardrobeError};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardrobeConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub candidates: CandidatesConfig,
    #[serde(default)]
    pub visibility: VisibilityConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub openweather_key: Option<String>,
    #[serde(default = "default_city")]
    pub default_city: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            openweather_key: None,
            default_city: default_city(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// How many items the wardrobe listing asks for.
    #[serde(default = "default_catalog_limit")]
    pub limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            limit: default_catalog_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesConfig {
    #[serde(default = "default_cap")]
    pub top_cap: usize,
    #[serde(default = "default_cap")]
    pub bottom_cap: usize,
    /// Catalog size fetched for the fallback scan.
    #[serde(default = "default_catalog_limit")]
    pub fallback_limit: usize,
}

impl Default for CandidatesConfig {
    fn default() -> Self {
        Self {
            top_cap: default_cap(),
            bottom_cap: default_cap(),
            fallback_limit: default_catalog_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityConfig {
    /// Lookahead around the viewport, in layout units.
    #[serde(default = "default_margin")]
    pub margin: u32,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            margin: default_margin(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Custom path for the preference file. Defaults to `~/.config/wardrobe/preferences.json`.
    #[serde(default)]
    pub path: Option<String>,
}

impl PreferencesConfig {
    pub fn resolved_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(p) => Ok(PathBuf::from(p)),
            None => config_dir()
                .map(|d| d.join("preferences.json"))
                .ok_or_else(|| {
                    WardrobeError::Config("cannot determine config directory".to_string())
                }),
        }
    }
}

// -- Defaults --

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_city() -> String {
    "Lahore".to_string()
}
fn default_catalog_limit() -> usize {
    200
}
fn default_cap() -> usize {
    5
}
fn default_margin() -> u32 {
    100
}

/// Env var that overrides `api.base_url`.
pub const API_URL_ENV: &str = "WARDROBE_API_URL";
/// Env var consulted when `api.openweather_key` is unset.
pub const OPENWEATHER_KEY_ENV: &str = "OPENWEATHER_KEY";

impl WardrobeConfig {
    /// Load configuration with three-layer TOML merge:
    /// 1. ~/.config/wardrobe/config.toml (global)
    /// 2. .wardrobe/config.toml (project)
    /// 3. .wardrobe/config.local.toml (local, gitignored)
    ///
    /// `WARDROBE_API_URL` then overrides the base URL.
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Layer 1: Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            // Layer 2: Project config
            let project_config = dir.join(".wardrobe").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            // Layer 3: Local config
            let local_config = dir.join(".wardrobe").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| WardrobeError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| WardrobeError::Config(e.to_string()))?;

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                cfg.api.base_url = url;
            }
        }

        cfg.validate();
        Ok(cfg)
    }

    /// Validate config values, fixing out-of-range values and logging warnings.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            warnings.push(format!(
                "api.base_url '{}' is not an http(s) URL",
                self.api.base_url
            ));
        }

        let positive_checks: Vec<(&str, &mut usize)> = vec![
            ("catalog.limit", &mut self.catalog.limit),
            ("candidates.top_cap", &mut self.candidates.top_cap),
            ("candidates.bottom_cap", &mut self.candidates.bottom_cap),
            ("candidates.fallback_limit", &mut self.candidates.fallback_limit),
        ];
        for (name, val) in positive_checks {
            if *val == 0 {
                warnings.push(format!("{name} = 0, setting to 1"));
                *val = 1;
            }
        }

        if self.api.timeout_secs == 0 {
            warnings.push(format!(
                "api.timeout_secs = 0, setting to {}",
                default_timeout_secs()
            ));
            self.api.timeout_secs = default_timeout_secs();
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }

    /// OpenWeather key from config, falling back to `OPENWEATHER_KEY`.
    pub fn openweather_key(&self) -> Option<String> {
        match self.api.openweather_key {
            Some(ref key) if !key.is_empty() => Some(key.clone()),
            _ => std::env::var(OPENWEATHER_KEY_ENV)
                .ok()
                .filter(|k| !k.is_empty()),
        }
    }
}

fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wardrobe"))
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}
