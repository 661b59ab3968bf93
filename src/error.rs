//! Error types for the omnisearch application layer.

/// Errors raised while setting up a search from the command line.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration file could not be parsed or holds invalid values.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The search pipeline rejected its settings.
    #[error(transparent)]
    Search(#[from] omni_search::SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
