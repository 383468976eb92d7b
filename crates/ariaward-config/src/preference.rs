//! Persisted on/off preference.
//!
//! Storage is best-effort: [`load_enabled_or`] and [`save_enabled_quietly`]
//! log failures and fall back, so a broken or missing store only costs
//! persistence.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;

/// Stored user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub enabled: bool,
}

/// Preference storage backend.
pub trait PreferenceStore: Send + Sync {
    /// Stored preferences, `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<Preferences>, StorageError>;

    /// Persist preferences.
    fn save(&self, preferences: &Preferences) -> Result<(), StorageError>;
}

/// `<config dir>/ariaward/preferences.json`.
pub fn default_preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ariaward").join("preferences.json"))
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`default_preferences_path`].
    pub fn at_default_location() -> Result<Self, StorageError> {
        default_preferences_path()
            .map(Self::new)
            .ok_or_else(|| StorageError::Unavailable("no config directory".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Option<Preferences>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let preferences = serde_json::from_str(&content)?;
        Ok(Some(preferences))
    }

    fn save(&self, preferences: &Preferences) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(preferences)?;
        fs::write(&self.path, content)?;
        debug!("Preferences saved to {:?}", self.path);
        Ok(())
    }
}

/// In-memory store for tests and hosts without persistent storage.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    preferences: RwLock<Option<Preferences>>,
    unavailable: bool,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, like disabled browser storage.
    pub fn unavailable() -> Self {
        Self {
            preferences: RwLock::new(None),
            unavailable: true,
        }
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        Ok(())
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Option<Preferences>, StorageError> {
        self.check()?;
        Ok(*self.preferences.read())
    }

    fn save(&self, preferences: &Preferences) -> Result<(), StorageError> {
        self.check()?;
        *self.preferences.write() = Some(*preferences);
        Ok(())
    }
}

/// Saved `enabled` flag, or `default` when nothing is stored or the store
/// fails.
pub fn load_enabled_or(store: &dyn PreferenceStore, default: bool) -> bool {
    match store.load() {
        Ok(Some(preferences)) => preferences.enabled,
        Ok(None) => default,
        Err(e) => {
            warn!("Failed to load preferences, using default: {}", e);
            default
        }
    }
}

/// Save the `enabled` flag. Returns false if the store failed.
pub fn save_enabled_quietly(store: &dyn PreferenceStore, enabled: bool) -> bool {
    match store.save(&Preferences { enabled }) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save preferences: {}", e);
            false
        }
    }
}
