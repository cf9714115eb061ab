//! Local key-value preference storage and the style quiz answers kept in it.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WardrobeError};

/// Key under which quiz answers are stored.
pub const STYLE_PREFERENCES_KEY: &str = "stylePreferences";

/// String key-value store. Values are opaque; no expiry, no schema.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: String) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store, used by tests and as a fallback when no config dir exists.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// JSON object on disk, read on first access and rewritten on every change.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: OnceCell<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn values(&self) -> Result<&BTreeMap<String, String>> {
        if let Some(values) = self.values.get() {
            return Ok(values);
        }
        let loaded = read_store(&self.path)?;
        Ok(self.values.get_or_init(|| loaded))
    }

    fn values_mut(&mut self) -> Result<&mut BTreeMap<String, String>> {
        if self.values.get().is_none() {
            let loaded = read_store(&self.path)?;
            let _ = self.values.set(loaded);
        }
        self.values
            .get_mut()
            .ok_or_else(|| WardrobeError::Preferences("preference store not loaded".into()))
    }

    fn flush(&self) -> Result<()> {
        let values = self.values()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WardrobeError::Preferences(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, json).map_err(|e| {
            WardrobeError::Preferences(format!("cannot write {}: {e}", self.path.display()))
        })?;
        tracing::debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}

fn read_store(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let text = std::fs::read_to_string(path).map_err(|e| {
        WardrobeError::Preferences(format!("cannot read {}: {e}", path.display()))
    })?;
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&text).map_err(|e| {
        WardrobeError::Preferences(format!("corrupt preference file {}: {e}", path.display()))
    })
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values_mut()?.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values_mut()?.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

pub struct QuizQuestion {
    pub id: &'static str,
    pub question: &'static str,
    pub options: &'static [&'static str],
}

pub const QUIZ_QUESTIONS: &[QuizQuestion] = &[
    QuizQuestion {
        id: "style",
        question: "What best describes your personal style?",
        options: &["casual", "formal", "bohemian", "minimalist", "trendy", "classic"],
    },
    QuizQuestion {
        id: "body_type",
        question: "What best describes your body type?",
        options: &["hourglass", "pear", "apple", "rectangle", "inverted_triangle"],
    },
    QuizQuestion {
        id: "color_preference",
        question: "What colors do you gravitate towards?",
        options: &["neutrals", "warm", "cool", "pastels", "bold", "mixed"],
    },
    QuizQuestion {
        id: "lifestyle",
        question: "What best describes your lifestyle needs?",
        options: &["work", "casual", "events", "sports", "mixed"],
    },
    QuizQuestion {
        id: "season",
        question: "What season do you prefer dressing for?",
        options: &["spring", "summer", "fall", "winter", "all"],
    },
];

pub fn quiz_question(id: &str) -> Option<&'static QuizQuestion> {
    QUIZ_QUESTIONS.iter().find(|q| q.id == id)
}

/// Style quiz answers, question id → chosen option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StylePreferences {
    answers: BTreeMap<String, String>,
}

impl StylePreferences {
    /// Read saved answers. A value that does not parse is logged and ignored.
    pub fn load(store: &impl PreferenceStore) -> Result<Option<Self>> {
        let Some(raw) = store.get(STYLE_PREFERENCES_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(prefs) => Ok(Some(prefs)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse saved style preferences");
                Ok(None)
            }
        }
    }

    pub fn save(&self, store: &mut impl PreferenceStore) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(STYLE_PREFERENCES_KEY, json)
    }

    /// Record an answer; both the question and the option must be known.
    pub fn answer(&mut self, question: &str, value: &str) -> Result<()> {
        let q = quiz_question(question).ok_or_else(|| {
            WardrobeError::InvalidInput(format!("unknown quiz question '{question}'"))
        })?;
        if !q.options.contains(&value) {
            return Err(WardrobeError::InvalidInput(format!(
                "'{value}' is not an option for '{question}' (expected one of: {})",
                q.options.join(", ")
            )));
        }
        self.answers.insert(question.to_string(), value.to_string());
        Ok(())
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.answers.get(question).map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        QUIZ_QUESTIONS
            .iter()
            .all(|q| self.answers.contains_key(q.id))
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.answers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryPreferenceStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v".into()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = FilePreferenceStore::new(&path);
        assert_eq!(store.get("theme").unwrap(), None);
        store.set("theme", "dark".into()).unwrap();
        assert!(path.exists());

        let reopened = FilePreferenceStore::new(&path);
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_store_loads_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = FilePreferenceStore::new(&path);
        // Written after construction but before first read.
        std::fs::write(&path, r#"{"a": "1"}"#).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        // Later disk edits are not picked up; the first read is cached.
        std::fs::write(&path, r#"{"a": "2"}"#).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FilePreferenceStore::new(&path);
        let err = store.get("a").unwrap_err();
        assert!(matches!(err, WardrobeError::Preferences(_)));
    }

    #[test]
    fn test_style_preferences_roundtrip_through_store() {
        let mut store = MemoryPreferenceStore::new();
        assert_eq!(StylePreferences::load(&store).unwrap(), None);

        let mut prefs = StylePreferences::default();
        prefs.answer("style", "minimalist").unwrap();
        prefs.answer("season", "winter").unwrap();
        prefs.save(&mut store).unwrap();

        let raw = store.get(STYLE_PREFERENCES_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"season":"winter","style":"minimalist"}"#);

        let loaded = StylePreferences::load(&store).unwrap().unwrap();
        assert_eq!(loaded.get("style"), Some("minimalist"));
        assert!(!loaded.is_complete());
    }

    #[test]
    fn test_style_preferences_bad_json_is_none() {
        let mut store = MemoryPreferenceStore::new();
        store.set(STYLE_PREFERENCES_KEY, "{broken".into()).unwrap();
        assert_eq!(StylePreferences::load(&store).unwrap(), None);
    }

    #[test]
    fn test_answer_validation() {
        let mut prefs = StylePreferences::default();
        assert!(prefs.answer("style", "gothic").is_err());
        assert!(prefs.answer("shoe_size", "42").is_err());
        assert!(prefs.is_empty());
    }

    #[test]
    fn test_complete_quiz() {
        let mut prefs = StylePreferences::default();
        for q in QUIZ_QUESTIONS {
            prefs.answer(q.id, q.options[0]).unwrap();
        }
        assert!(prefs.is_complete());
        assert_eq!(prefs.iter().count(), QUIZ_QUESTIONS.len());
    }
}
