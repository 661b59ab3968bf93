//! Configuration types for the omnisearch command.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) gives a working configuration.
//!
//! ```toml
//! [search]
//! engine = "brave"
//! pages = 3
//! page_delay_ms = [200, 500]
//!
//! [logging]
//! level = "debug"
//! ```

use std::path::{Path, PathBuf};

use omni_search::{EngineId, SearchConfig};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Search pipeline settings.
    pub search: SearchSettings,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// The `[search]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Engine used when none is given on the command line.
    pub engine: String,
    /// Extra passes over the fetch sequence after a network failure.
    pub retries: u32,
    /// Delay between retry passes in milliseconds.
    pub retry_delay_ms: u64,
    /// Per-request timeout in seconds.
    pub fetch_timeout_seconds: u64,
    /// Result pages to read (None = engine default).
    pub pages: Option<usize>,
    /// Pages fetched concurrently.
    pub page_concurrency: usize,
    /// Consecutive failing pages before an engine is abandoned (None = never).
    pub max_consecutive_failures: Option<usize>,
    /// Random delay range `[min, max]` in milliseconds between pages.
    pub page_delay_ms: (u64, u64),
    /// Whole-search deadline in seconds (0 = none).
    pub search_timeout_seconds: u64,
    /// Fail instead of returning partial results when the deadline hits.
    pub require_complete: bool,
    /// Fixed User-Agent (None = rotate built-in browser agents).
    pub user_agent: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            engine: EngineId::default().as_str().to_string(),
            retries: defaults.retries,
            retry_delay_ms: defaults.retry_delay_ms,
            fetch_timeout_seconds: defaults.fetch_timeout_seconds,
            pages: defaults.pages,
            page_concurrency: defaults.page_concurrency,
            max_consecutive_failures: defaults.max_consecutive_failures,
            page_delay_ms: defaults.page_delay_ms,
            search_timeout_seconds: defaults.search_timeout_seconds,
            require_complete: defaults.require_complete,
            user_agent: defaults.user_agent,
        }
    }
}

impl SearchSettings {
    /// The pipeline configuration these settings describe.
    pub fn to_search_config(&self) -> SearchConfig {
        SearchConfig {
            retries: self.retries,
            retry_delay_ms: self.retry_delay_ms,
            fetch_timeout_seconds: self.fetch_timeout_seconds,
            pages: self.pages,
            page_concurrency: self.page_concurrency,
            max_consecutive_failures: self.max_consecutive_failures,
            page_delay_ms: self.page_delay_ms,
            search_timeout_seconds: self.search_timeout_seconds,
            require_complete: self.require_complete,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// The `[logging]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for omnisearch crates when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds invalid search settings.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise the default path when that file
    /// exists, otherwise defaults.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_file`]. An explicit `path` that does not
    /// exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Check the search settings against the pipeline's rules.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Search`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.search.to_search_config().validate()?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/omnisearch/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("omnisearch").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("omnisearch")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/omnisearch-config/config.toml")
        }
    }
}
