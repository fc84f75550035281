//! Runtime configuration for board and workspace services.

use std::num::NonZeroU32;
use thiserror::Error;

/// Environment variable listing default column titles, comma separated.
pub const DEFAULT_COLUMNS_VAR: &str = "TASKBOARD_DEFAULT_COLUMNS";

/// Environment variable bounding optimistic save attempts per operation.
pub const MAX_SAVE_ATTEMPTS_VAR: &str = "TASKBOARD_MAX_SAVE_ATTEMPTS";

const DEFAULT_COLUMN_TITLES: [&str; 3] = ["To Do", "In Progress", "Done"];

/// Default number of load-apply-save attempts before giving up on a
/// contended aggregate.
const DEFAULT_MAX_SAVE_ATTEMPTS: NonZeroU32 = NonZeroU32::MIN.saturating_add(2);

/// Errors raised while reading configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The default column list contained no usable titles.
    #[error("{DEFAULT_COLUMNS_VAR} must list at least one non-empty column title")]
    EmptyDefaultColumns,

    /// The save attempt bound was not a positive integer.
    #[error("{MAX_SAVE_ATTEMPTS_VAR} must be a positive integer, got '{0}'")]
    InvalidMaxSaveAttempts(String),
}

/// Tunables shared by the board and workspace services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    default_columns: Vec<String>,
    max_save_attempts: NonZeroU32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_columns: DEFAULT_COLUMN_TITLES
                .iter()
                .map(|title| (*title).to_owned())
                .collect(),
            max_save_attempts: DEFAULT_MAX_SAVE_ATTEMPTS,
        }
    }
}

impl BoardConfig {
    /// Loads configuration from process environment variables, falling back
    /// to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a looked-up value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw_columns) = lookup(DEFAULT_COLUMNS_VAR) {
            let titles: Vec<String> = raw_columns
                .split(',')
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map(str::to_owned)
                .collect();
            if titles.is_empty() {
                return Err(ConfigError::EmptyDefaultColumns);
            }
            config.default_columns = titles;
        }

        if let Some(raw_attempts) = lookup(MAX_SAVE_ATTEMPTS_VAR) {
            config.max_save_attempts = raw_attempts
                .trim()
                .parse::<NonZeroU32>()
                .map_err(|_| ConfigError::InvalidMaxSaveAttempts(raw_attempts))?;
        }

        Ok(config)
    }

    /// Overrides the default column titles.
    #[must_use]
    pub fn with_default_columns(mut self, titles: impl IntoIterator<Item = String>) -> Self {
        self.default_columns = titles.into_iter().collect();
        self
    }

    /// Overrides the optimistic save attempt bound.
    #[must_use]
    pub const fn with_max_save_attempts(mut self, attempts: NonZeroU32) -> Self {
        self.max_save_attempts = attempts;
        self
    }

    /// Column titles used when a project is created without explicit columns.
    #[must_use]
    pub fn default_columns(&self) -> &[String] {
        &self.default_columns
    }

    /// Maximum load-apply-save attempts per mutating operation.
    #[must_use]
    pub const fn max_save_attempts(&self) -> NonZeroU32 {
        self.max_save_attempts
    }
}
