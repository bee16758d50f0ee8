//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (retention bound > 0)
//! - Reject empty or duplicate subject ids
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StoreConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::StoreConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("retention.max_reports_per_view must be at least 1")]
    ZeroRetention,

    #[error("watchlist.subjects[{0}] is empty")]
    EmptySubject(usize),

    #[error("watchlist.subjects contains duplicate subject {0:?}")]
    DuplicateSubject(String),

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &StoreConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.retention.max_reports_per_view == 0 {
        errors.push(ValidationError::ZeroRetention);
    }

    let mut seen = HashSet::new();
    for (i, subject) in config.watchlist.subjects.iter().enumerate() {
        if subject.trim().is_empty() {
            errors.push(ValidationError::EmptySubject(i));
        } else if !seen.insert(subject.as_str()) {
            errors.push(ValidationError::DuplicateSubject(subject.clone()));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&StoreConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = StoreConfig::default();
        config.retention.max_reports_per_view = 0;
        config.watchlist.subjects = vec!["a".into(), "".into(), "a".into()];
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroRetention,
                ValidationError::EmptySubject(1),
                ValidationError::DuplicateSubject("a".into()),
                ValidationError::UnknownLogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = StoreConfig::default();
        config.observability.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
