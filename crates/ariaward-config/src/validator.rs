//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Rule names the standard rule set knows about.
pub const KNOWN_RULES: &[&str] = &[
    "icon_labels",
    "clickable",
    "form_labels",
    "dropdowns",
    "sliders",
    "landmarks",
    "tabs",
    "dialogs",
    "sticky_headers",
    "tabindex",
];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// The first error as a [`ConfigError::InvalidValue`].
    pub fn into_error(self) -> Option<ConfigError> {
        self.errors
            .into_iter()
            .next()
            .map(|e| ConfigError::InvalidValue {
                field: e.path,
                message: e.message,
            })
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_engine(config, &mut result);
        Self::validate_rules(config, &mut result);
        Self::validate_preferences(config, &mut result);

        Ok(result)
    }

    fn validate_engine(config: &Config, result: &mut ValidationResult) {
        if config.engine.gc_threshold == 0 {
            result.add_error(ValidationError::new(
                "engine.gc_threshold",
                "gc_threshold must be greater than 0",
            ));
        }

        if config.engine.gc_threshold > 10_000 {
            result.add_warning(ValidationWarning::new(
                "engine.gc_threshold",
                "gc_threshold is very high (>10000), stale ledger entries will accumulate",
            ));
        }

        if config.engine.frame_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "engine.frame_interval_ms",
                "frame_interval_ms must be greater than 0",
            ));
        }

        if config.engine.announce_delay_ms > 5_000 {
            result.add_warning(ValidationWarning::new(
                "engine.announce_delay_ms",
                "announce_delay_ms above 5s delays announcements noticeably",
            ));
        }
    }

    fn validate_rules(config: &Config, result: &mut ValidationResult) {
        for name in &config.rules.disabled {
            if !KNOWN_RULES.contains(&name.as_str()) {
                result.add_warning(ValidationWarning::new(
                    "rules.disabled",
                    format!("Unknown rule '{}', valid values: {:?}", name, KNOWN_RULES),
                ));
            }
        }

        if config.rules.skip_link_text.trim().is_empty() {
            result.add_error(ValidationError::new(
                "rules.skip_link_text",
                "skip_link_text cannot be empty",
            ));
        }

        for pattern in &config.rules.item_class_patterns {
            if pattern.trim().is_empty() {
                result.add_warning(ValidationWarning::new(
                    "rules.item_class_patterns",
                    "Empty item class pattern is ignored",
                ));
            }
        }
    }

    fn validate_preferences(config: &Config, result: &mut ValidationResult) {
        if let Some(ref path) = config.preferences.path {
            if path.is_dir() {
                result.add_error(ValidationError::new(
                    "preferences.path",
                    format!("Preferences path is a directory: {:?}", path),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
