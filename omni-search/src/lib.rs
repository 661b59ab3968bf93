//! # omni-search
//!
//! Resilient metasearch over scraped engine result pages.
//!
//! A query is sent to one engine, several result pages are fetched and
//! parsed with CSS selectors, duplicates are removed and the remaining
//! records are ranked by keyword relevance. No API keys are needed.
//!
//! ## Design
//!
//! - Scrapes DuckDuckGo, Google, Brave and Startpage HTML with ordered
//!   fallback selector layouts per engine
//! - Fetches fall back from `https` to `http` and retry a bounded number of
//!   times; one bad page never fails a search
//! - User-Agent rotation and inter-page jitter for reliability
//! - No state survives a request: no caches, no global counters
//!
//! ## Security
//!
//! - No network listeners; this is a library
//! - Search queries are logged only at trace level

pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod transport;
pub mod types;

pub use config::SearchConfig;
pub use engine::EngineAdapter;
pub use error::{Recovery, Result, SearchError};
pub use orchestrator::search::Pipeline;
pub use tokio_util::sync::CancellationToken;
pub use transport::{FetchOutcome, FetchStatus, HttpTransport, PageFetcher};
pub use types::{EngineId, Query, SearchResponse, SearchResult};

/// Search `engine` for `query` over HTTP.
///
/// `engine` is an engine id (`duckduckgo`, `google`, `brave`,
/// `startpage`); anything else searches DuckDuckGo.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid or the HTTP client
/// cannot be built. Problems with the query or the engine are reported in
/// the returned [`SearchResponse`] instead.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> omni_search::Result<()> {
/// let config = omni_search::SearchConfig::default();
/// let response = omni_search::search("rust programming", "duckduckgo", &config).await?;
/// for result in &response.results {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, engine: &str, config: &SearchConfig) -> Result<SearchResponse> {
    let pipeline = Pipeline::from_config(config.clone())?;
    Ok(pipeline.search(query, engine).await)
}

/// Search DuckDuckGo with [`SearchConfig::default()`].
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_default(query: &str) -> Result<SearchResponse> {
    search(query, EngineId::default().as_str(), &SearchConfig::default()).await
}
