//! The search pipeline: validate, paginate, dedup, rank, truncate.
//!
//! [`Pipeline::search`] never fails outright. Request-level problems (an
//! empty query, an unfinished search under `require_complete`) become a
//! [`SearchResponse`] with `success: false` and an `error` message, and an
//! engine that cannot be reached looks the same as one with no matches.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::engine::EngineAdapter;
use crate::error::SearchError;
use crate::transport::{HttpTransport, PageFetcher};
use crate::types::{EngineId, Query, SearchResponse};

use super::dedup::dedup;
use super::paginate::Paginator;
use super::scoring::rank;

/// Upper bound on results in a response.
pub const MAX_RESULTS: usize = 100;

/// Composes transport, extraction, pagination, dedup and ranking.
///
/// Generic over the [`PageFetcher`] so tests can script page responses.
#[derive(Debug, Clone)]
pub struct Pipeline<F = HttpTransport> {
    fetcher: F,
    config: SearchConfig,
}

impl Pipeline<HttpTransport> {
    /// A pipeline fetching over HTTP with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid or the HTTP
    /// client cannot be built.
    pub fn from_config(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let fetcher = HttpTransport::from_config(&config)?;
        Ok(Self { fetcher, config })
    }
}

impl<F: PageFetcher> Pipeline<F> {
    pub fn new(fetcher: F, config: SearchConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Search `engine` (by id; unknown ids fall back to DuckDuckGo) for
    /// `query_text`, bounded by the configured search timeout.
    pub async fn search(&self, query_text: &str, engine: &str) -> SearchResponse {
        self.search_with_cancel(query_text, engine, &CancellationToken::new())
            .await
    }

    /// Like [`Pipeline::search`], stopping early when `cancel` fires.
    pub async fn search_with_cancel(
        &self,
        query_text: &str,
        engine: &str,
        cancel: &CancellationToken,
    ) -> SearchResponse {
        let adapter = EngineAdapter::for_engine(EngineId::resolve(engine));
        self.search_adapter(query_text, adapter, cancel).await
    }

    /// Run the pipeline against an explicit adapter, e.g. one pointed at a
    /// mirror with [`EngineAdapter::with_url_template`].
    pub async fn search_adapter(
        &self,
        query_text: &str,
        adapter: &EngineAdapter,
        cancel: &CancellationToken,
    ) -> SearchResponse {
        let engine = adapter.engine;
        let query = match Query::new(query_text, engine) {
            Ok(query) => query,
            Err(err) => {
                tracing::debug!(engine = %engine, error = %err, "search rejected");
                return SearchResponse::failure(query_text.trim(), engine, &err);
            }
        };
        tracing::trace!(engine = %engine, query = query.raw_text(), "search started");

        let page_count = self.config.pages.unwrap_or(adapter.default_pages);
        let deadline = self.config.search_timeout().map(|t| Instant::now() + t);

        let aggregate = match Paginator::new(&self.fetcher, &self.config)
            .with_cancel(cancel.clone())
            .with_deadline(deadline)
            .aggregate(query.raw_text(), adapter, page_count)
            .await
        {
            Ok(aggregate) => aggregate,
            Err(err) => return SearchResponse::failure(query.raw_text(), engine, &err),
        };

        if aggregate.interrupted && self.config.require_complete {
            let err = SearchError::Timeout("search interrupted before all pages were read".into());
            return SearchResponse::failure(query.raw_text(), engine, &err);
        }

        let mut results = rank(dedup(aggregate.records), &query.keywords());
        results.truncate(MAX_RESULTS);

        tracing::debug!(
            engine = %engine,
            count = results.len(),
            failed_pages = aggregate.failed_pages,
            interrupted = aggregate.interrupted,
            "search finished"
        );
        SearchResponse::from_results(query.raw_text(), engine, results, aggregate.interrupted)
    }
}
