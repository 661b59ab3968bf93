//! Error types for the omni-search crate.
//!
//! Every stage of the pipeline returns `Result<T, SearchError>`. Whether an
//! error is absorbed locally or surfaced to the caller is decided by
//! [`SearchError::recovery`], so the policy lives in one table instead of
//! being scattered across call sites.

/// Errors that can occur during a metasearch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// DNS, connect or TLS failure talking to an engine.
    #[error("network error: {0}")]
    Network(String),

    /// The engine answered with a status other than 200.
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// A fetch attempt, or the whole search, ran past its deadline.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Markup did not have the structure a selector layout expects.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// The request itself is unusable (e.g. empty query).
    #[error("invalid request: {0}")]
    Validation(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// How the pipeline reacts to a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Retry the fetch (scheme downgrade, then bounded retry), skip the page
    /// once attempts are exhausted.
    RetryThenSkipPage,
    /// Give up on this page, continue with the next one.
    SkipPage,
    /// Drop the single candidate record, keep extracting.
    SkipCandidate,
    /// Abort the request and report to the caller.
    Propagate,
}

impl SearchError {
    /// The recovery policy for this error kind.
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Network(_) | Self::Timeout(_) => Recovery::RetryThenSkipPage,
            Self::Http(_) => Recovery::SkipPage,
            Self::Extraction(_) => Recovery::SkipCandidate,
            Self::Validation(_) | Self::Config(_) => Recovery::Propagate,
        }
    }

    /// Whether the fetch that produced this error may be attempted again.
    pub fn is_retryable(&self) -> bool {
        self.recovery() == Recovery::RetryThenSkipPage
    }
}

/// Convenience type alias for omni-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network() {
        let err = SearchError::Network("connection refused".into());
        assert_eq!(err.to_string(), "network error: connection refused");
    }

    #[test]
    fn display_http() {
        let err = SearchError::Http(503);
        assert_eq!(err.to_string(), "HTTP error: status 503");
    }

    #[test]
    fn display_timeout() {
        let err = SearchError::Timeout("exceeded 10s limit".into());
        assert_eq!(err.to_string(), "timed out: exceeded 10s limit");
    }

    #[test]
    fn display_validation() {
        let err = SearchError::Validation("query must not be empty".into());
        assert_eq!(err.to_string(), "invalid request: query must not be empty");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("fetch_timeout_seconds must be > 0".into());
        assert_eq!(
            err.to_string(),
            "config error: fetch_timeout_seconds must be > 0"
        );
    }

    #[test]
    fn recovery_table() {
        assert_eq!(
            SearchError::Network(String::new()).recovery(),
            Recovery::RetryThenSkipPage
        );
        assert_eq!(
            SearchError::Timeout(String::new()).recovery(),
            Recovery::RetryThenSkipPage
        );
        assert_eq!(SearchError::Http(404).recovery(), Recovery::SkipPage);
        assert_eq!(
            SearchError::Extraction(String::new()).recovery(),
            Recovery::SkipCandidate
        );
        assert_eq!(
            SearchError::Validation(String::new()).recovery(),
            Recovery::Propagate
        );
        assert_eq!(
            SearchError::Config(String::new()).recovery(),
            Recovery::Propagate
        );
    }

    #[test]
    fn http_errors_are_not_retryable() {
        assert!(!SearchError::Http(500).is_retryable());
        assert!(SearchError::Timeout("slow".into()).is_retryable());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
