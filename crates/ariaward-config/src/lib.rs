//! # ariaward Config
//!
//! TOML configuration for the engine and the persisted on/off preference.

mod error;
mod loader;
mod preference;
mod schema;
mod validator;

pub use error::{ConfigError, StorageError};
pub use loader::ConfigLoader;
pub use preference::{
    default_preferences_path, load_enabled_or, save_enabled_quietly, FilePreferenceStore,
    MemoryPreferenceStore, PreferenceStore, Preferences,
};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
