//! Runtime configuration for the task board services.

use crate::task::domain::OwnerTransitionPolicy;
use serde::Deserialize;
use thiserror::Error;

/// Longest title the persistent schema can hold (`VARCHAR(255)`).
pub const MAX_STORED_TITLE_LENGTH: usize = 255;

/// Limits and policies applied by the task board services.
///
/// # Examples
///
/// ```
/// use taskboard::config::TaskBoardConfig;
/// use taskboard::task::domain::OwnerTransitionPolicy;
///
/// let config = TaskBoardConfig::default();
/// assert_eq!(config.max_title_length, 255);
/// assert_eq!(config.owner_transitions, OwnerTransitionPolicy::Unrestricted);
///
/// let parsed = TaskBoardConfig::from_json(r#"{"owner_transitions": "forward-only"}"#)
///     .expect("valid configuration");
/// assert_eq!(parsed.owner_transitions, OwnerTransitionPolicy::ForwardOnly);
/// assert_eq!(parsed.max_label_length, 255);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskBoardConfig {
    /// Maximum board and task title length in characters.
    pub max_title_length: usize,
    /// Maximum label title length in characters.
    pub max_label_length: usize,
    /// How far owners may move tasks through the workflow.
    pub owner_transitions: OwnerTransitionPolicy,
}

impl Default for TaskBoardConfig {
    fn default() -> Self {
        Self {
            max_title_length: MAX_STORED_TITLE_LENGTH,
            max_label_length: MAX_STORED_TITLE_LENGTH,
            owner_transitions: OwnerTransitionPolicy::Unrestricted,
        }
    }
}

impl TaskBoardConfig {
    /// Creates a strict configuration: shorter titles and forward-only owner
    /// moves.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_title_length: 120,
            max_label_length: 60,
            owner_transitions: OwnerTransitionPolicy::ForwardOnly,
        }
    }

    /// Parses a configuration from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the payload is not valid JSON or
    /// names an unknown field, [`ConfigError::ZeroLimit`] when a length
    /// limit is zero and [`ConfigError::LimitTooLarge`] when a length limit
    /// exceeds [`MAX_STORED_TITLE_LENGTH`].
    pub fn from_json(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every limit is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLimit`] or [`ConfigError::LimitTooLarge`]
    /// naming the first unusable limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_limit("max_title_length", self.max_title_length)?;
        check_limit("max_label_length", self.max_label_length)
    }

    /// Title limit applied to boards and tasks, capped at what storage
    /// holds even when [`Self::validate`] was skipped.
    #[must_use]
    pub const fn title_limit(&self) -> usize {
        min_limit(self.max_title_length)
    }

    /// Label limit, capped like [`Self::title_limit`].
    #[must_use]
    pub const fn label_limit(&self) -> usize {
        min_limit(self.max_label_length)
    }
}

fn check_limit(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroLimit(field));
    }
    if value > MAX_STORED_TITLE_LENGTH {
        return Err(ConfigError::LimitTooLarge {
            field,
            max: MAX_STORED_TITLE_LENGTH,
        });
    }
    Ok(())
}

const fn min_limit(value: usize) -> usize {
    if value > MAX_STORED_TITLE_LENGTH {
        MAX_STORED_TITLE_LENGTH
    } else {
        value
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The payload could not be deserialized.
    #[error("invalid task board configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A length limit was configured as zero.
    #[error("configuration field {0} must be greater than zero")]
    ZeroLimit(&'static str),

    /// A length limit exceeds what storage can hold.
    #[error("configuration field {field} must not exceed {max}")]
    LimitTooLarge {
        /// Offending field.
        field: &'static str,
        /// Largest accepted value.
        max: usize,
    },
}
