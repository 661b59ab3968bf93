//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the transport retry policy, timeouts and the
//! pagination budget. Retry counts and timeouts are tunable rather than
//! fixed; the defaults are tuned for polite scraping of a single engine.

use std::time::Duration;

use crate::error::SearchError;

/// Configuration for the search pipeline.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Extra passes over the full fetch sequence (original URL, then the
    /// HTTP downgrade) after a network-level failure. 0 disables retries.
    pub retries: u32,
    /// Fixed delay between retry passes, in milliseconds.
    pub retry_delay_ms: u64,
    /// Per-request HTTP timeout in seconds.
    pub fetch_timeout_seconds: u64,
    /// Overrides the engine's default page count when set.
    pub pages: Option<usize>,
    /// Result pages fetched concurrently. 1 fetches pages one at a time.
    pub page_concurrency: usize,
    /// Consecutive page failures after which the remaining pages of an
    /// engine are abandoned. `None` reads every page regardless.
    pub max_consecutive_failures: Option<usize>,
    /// Random delay range in milliseconds `(min, max)` before every page
    /// after the first.
    pub page_delay_ms: (u64, u64),
    /// Whole-search deadline in seconds. 0 disables the deadline.
    pub search_timeout_seconds: u64,
    /// Treat a search cut short by the deadline as a failure instead of
    /// returning the partial results.
    pub require_complete: bool,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            retries: 2,
            retry_delay_ms: 500,
            fetch_timeout_seconds: 10,
            pages: None,
            page_concurrency: 1,
            max_consecutive_failures: None,
            page_delay_ms: (100, 300),
            search_timeout_seconds: 60,
            require_complete: false,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `fetch_timeout_seconds` must be greater than 0
    /// - `pages`, when set, must be greater than 0
    /// - `page_concurrency` must be greater than 0
    /// - `max_consecutive_failures`, when set, must be greater than 0
    /// - `page_delay_ms.0` must be <= `page_delay_ms.1`
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.fetch_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "fetch_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.pages == Some(0) {
            return Err(SearchError::Config(
                "pages must be greater than 0 when set".into(),
            ));
        }
        if self.page_concurrency == 0 {
            return Err(SearchError::Config(
                "page_concurrency must be greater than 0".into(),
            ));
        }
        if self.max_consecutive_failures == Some(0) {
            return Err(SearchError::Config(
                "max_consecutive_failures must be greater than 0 when set".into(),
            ));
        }
        if self.page_delay_ms.0 > self.page_delay_ms.1 {
            return Err(SearchError::Config(
                "page_delay_ms min must be <= max".into(),
            ));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// The whole-search deadline, `None` when disabled.
    pub fn search_timeout(&self) -> Option<Duration> {
        (self.search_timeout_seconds > 0).then(|| Duration::from_secs(self.search_timeout_seconds))
    }
}
