//! Error types reported by enhancement rules.

use thiserror::Error;

use ariaward_dom::DomError;

/// Errors a rule can report to the dispatcher.
///
/// The dispatcher logs these and moves on to the next rule.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A referenced element (panel, label target, tab panel) does not exist.
    #[error("Missing target: {0}")]
    MissingTarget(String),

    /// A document operation failed.
    #[error("Document error: {0}")]
    Dom(#[from] DomError),
}

/// Result type for rule execution.
pub type RuleResult<T> = Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_target_display() {
        let err = RuleError::MissingTarget("#menu".to_string());
        assert!(err.to_string().contains("#menu"));
    }
}
