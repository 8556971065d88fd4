//! Collator configuration
//!
//! Loaded from a JSON file. Every field is optional; a missing file is not
//! assumed, callers that have no file use `CollatorConfig::default()`.

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Edit merge window, in milliseconds.
///
/// The history UI labels this "5 minutes" but the value has always been
/// `5 * 1000 * 60 * 5`, i.e. 25 minutes. Kept as-is.
pub const DEFAULT_EDIT_MERGE_WINDOW_MS: u64 = 5 * 1000 * 60 * 5;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `CollatorConfig`
    #[error("Invalid config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field holds a value outside its allowed range
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// What to do with a log line that does not decode into a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// Fail the whole call on the first malformed line
    #[default]
    Abort,
    /// Log a warning, drop the line, keep going
    Skip,
}

/// Configuration for a collate call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollatorConfig {
    /// Adjacent edits on the same documents closer than this are merged
    #[serde(default = "default_edit_merge_window_ms")]
    pub edit_merge_window_ms: u64,

    /// Handling of malformed log lines
    #[serde(default)]
    pub parse_policy: ParsePolicy,
}

fn default_edit_merge_window_ms() -> u64 {
    DEFAULT_EDIT_MERGE_WINDOW_MS
}

impl Default for CollatorConfig {
    fn default() -> Self {
        Self {
            edit_merge_window_ms: DEFAULT_EDIT_MERGE_WINDOW_MS,
            parse_policy: ParsePolicy::Abort,
        }
    }
}

impl CollatorConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: CollatorConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Same defaults, but skip malformed log lines instead of failing
    pub fn skipping_malformed_lines() -> Self {
        Self {
            parse_policy: ParsePolicy::Skip,
            ..Self::default()
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.edit_merge_window_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "edit_merge_window_ms",
                reason: "must be > 0".to_string(),
            });
        }

        if i64::try_from(self.edit_merge_window_ms).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "edit_merge_window_ms",
                reason: format!("{} does not fit a signed millisecond count", self.edit_merge_window_ms),
            });
        }

        Ok(())
    }

    /// The merge window as a signed duration
    pub fn edit_merge_window(&self) -> Duration {
        Duration::milliseconds(i64::try_from(self.edit_merge_window_ms).unwrap_or(i64::MAX))
    }
}
