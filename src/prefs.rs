//! Persistent, profile-scoped user preferences.
//!
//! Two string keys live here: `language` and `theme`. They are read once at
//! startup and written only on explicit toggles, so writes never race; the
//! last writer wins.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use crate::i18n::Language;
use crate::theme::Theme;

pub const LANGUAGE_KEY: &str = "language";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write preferences to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Browser-style key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as a flat JSON object in the user's profile directory.
///
/// The file is read once on open and rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Ignoring malformed preferences at {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No preferences at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Cannot read preferences at {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content).map_err(io_error)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// Typed view over the two preference keys.
///
/// Write failures are logged and swallowed: the new value still applies to
/// the page, it just won't survive a reload.
#[derive(Debug, Clone)]
pub struct PreferenceStore<S> {
    store: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persisted language, if present and still supported.
    pub fn language(&self) -> Option<Language> {
        let code = self.store.get(LANGUAGE_KEY)?;
        match Language::from_code(&code) {
            Ok(language) => Some(language),
            Err(e) => {
                debug!("Ignoring stored language: {}", e);
                None
            }
        }
    }

    pub fn set_language(&mut self, language: Language) {
        if let Err(e) = self.store.set(LANGUAGE_KEY, language.code()) {
            warn!("Could not persist language preference: {}", e);
        }
    }

    pub fn theme(&self) -> Option<Theme> {
        self.store
            .get(THEME_KEY)
            .and_then(|value| Theme::parse(&value))
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if let Err(e) = self.store.set(THEME_KEY, theme.as_str()) {
            warn!("Could not persist theme preference: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== PreferenceStore Tests ====================

    #[test]
    fn test_language_round_trips_through_store() {
        let mut prefs = PreferenceStore::new(MemoryStore::new());
        assert_eq!(prefs.language(), None);

        prefs.set_language(Language::RUSSIAN);
        assert_eq!(prefs.language(), Some(Language::RUSSIAN));
        assert_eq!(prefs.store().get(LANGUAGE_KEY).as_deref(), Some("ru"));
    }

    #[test]
    fn test_unsupported_stored_language_is_ignored() {
        let prefs = PreferenceStore::new(MemoryStore::new().with(LANGUAGE_KEY, "fr"));
        assert_eq!(prefs.language(), None);
    }

    #[test]
    fn test_theme_values() {
        let mut prefs = PreferenceStore::new(MemoryStore::new().with(THEME_KEY, "light"));
        assert_eq!(prefs.theme(), Some(Theme::Light));

        prefs.set_theme(Theme::Dark);
        assert_eq!(prefs.store().get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_unknown_theme_is_ignored() {
        let prefs = PreferenceStore::new(MemoryStore::new().with(THEME_KEY, "sepia"));
        assert_eq!(prefs.theme(), None);
    }

    // ==================== FileStore Tests ====================

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path().join("prefs.json"));
        assert_eq!(store.get(LANGUAGE_KEY), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile").join("prefs.json");

        let mut store = FileStore::open(&path);
        store.set(LANGUAGE_KEY, "ru").unwrap();
        store.set(THEME_KEY, "light").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(LANGUAGE_KEY).as_deref(), Some("ru"));
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_file_store_last_writer_wins() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");

        let mut store = FileStore::open(&path);
        store.set(LANGUAGE_KEY, "ru").unwrap();
        store.set(LANGUAGE_KEY, "en").unwrap();

        assert_eq!(FileStore::open(&path).get(LANGUAGE_KEY).as_deref(), Some("en"));
    }

    #[test]
    fn test_file_store_malformed_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get(LANGUAGE_KEY), None);
    }

    #[test]
    fn test_file_store_write_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes every write fail.
        let path = temp_dir.path().join("prefs.json");
        std::fs::create_dir(&path).unwrap();

        let mut store = FileStore::open(&path);
        let err = store.set(LANGUAGE_KEY, "ru").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));

        // The typed wrapper swallows it and keeps the in-memory value.
        let mut prefs = PreferenceStore::new(store);
        prefs.set_language(Language::RUSSIAN);
        assert_eq!(prefs.language(), Some(Language::RUSSIAN));
    }
}
