//! Multi-page aggregation for a single engine.
//!
//! Pages are requested through a [`PageFetcher`], extracted with the
//! engine's adapter and appended in page order. A page that fails to fetch
//! or parse is logged and skipped unless its error's [`Recovery`] says to
//! propagate. Every page is attempted by default. Aggregation stops early
//! once [`MAX_AGGREGATED`] records are held, after an opt-in
//! `max_consecutive_failures` pages in a row have failed, or when the
//! caller cancels or the deadline passes. In the last two cases the records
//! gathered so far are returned with `interrupted` set.

use std::pin::pin;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use rand::Rng;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::engine::EngineAdapter;
use crate::error::{Recovery, SearchError};
use crate::transport::PageFetcher;
use crate::types::SearchResult;

/// Aggregation stops once this many records have been collected.
pub const MAX_AGGREGATED: usize = 100;

/// Records collected across pages, in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub records: Vec<SearchResult>,
    /// Pages whose fetch or extraction failed.
    pub failed_pages: usize,
    /// Cancellation or the deadline stopped aggregation before it finished.
    pub interrupted: bool,
}

/// Drives the page loop for one search request.
///
/// Holds no state beyond the request: the failure budget and cancellation
/// apply only to this aggregation.
pub struct Paginator<'a, F> {
    fetcher: &'a F,
    config: &'a SearchConfig,
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl<'a, F: PageFetcher> Paginator<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a SearchConfig) -> Self {
        Self {
            fetcher,
            config,
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Stop when `token` is cancelled.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Stop once `deadline` passes.
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Fetch and extract up to `page_count` pages of `query` from `adapter`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] if `query` is blank, or the first
    /// page error whose recovery is [`Recovery::Propagate`]. Other page
    /// failures never surface here.
    pub async fn aggregate(
        &self,
        query: &str,
        adapter: &EngineAdapter,
        page_count: usize,
    ) -> Result<Aggregate, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::Validation("query is empty".into()));
        }

        let mut aggregate = Aggregate::default();
        let mut consecutive_failures = 0;
        let concurrency = self.config.page_concurrency.max(1);

        let mut pages = pin!(stream::iter(0..page_count)
            .map(|page| self.fetch_page(query, adapter, page))
            .buffered(concurrency));

        loop {
            let next = tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    tracing::debug!(engine = %adapter.engine, "aggregation cancelled");
                    aggregate.interrupted = true;
                    break;
                }
                () = deadline_elapsed(self.deadline) => {
                    tracing::warn!(engine = %adapter.engine, "search deadline reached");
                    aggregate.interrupted = true;
                    break;
                }
                next = pages.next() => next,
            };

            let Some((page, outcome)) = next else {
                break;
            };

            match outcome {
                Ok(records) => {
                    consecutive_failures = 0;
                    tracing::debug!(
                        engine = %adapter.engine,
                        page,
                        count = records.len(),
                        "page extracted"
                    );
                    aggregate.records.extend(records);
                }
                Err(err) if err.recovery() == Recovery::Propagate => {
                    tracing::warn!(
                        engine = %adapter.engine,
                        page,
                        error = %err,
                        "aggregation aborted"
                    );
                    return Err(err);
                }
                Err(err) => {
                    consecutive_failures += 1;
                    aggregate.failed_pages += 1;
                    tracing::warn!(engine = %adapter.engine, page, error = %err, "page skipped");
                    if self
                        .config
                        .max_consecutive_failures
                        .is_some_and(|limit| consecutive_failures >= limit)
                    {
                        tracing::warn!(
                            engine = %adapter.engine,
                            failures = consecutive_failures,
                            "too many consecutive page failures, abandoning engine"
                        );
                        break;
                    }
                }
            }

            if aggregate.records.len() >= MAX_AGGREGATED {
                tracing::debug!(engine = %adapter.engine, page, "record budget reached");
                break;
            }
        }

        Ok(aggregate)
    }

    async fn fetch_page(
        &self,
        query: &str,
        adapter: &EngineAdapter,
        page: usize,
    ) -> (usize, Result<Vec<SearchResult>, SearchError>) {
        if page > 0 {
            let delay = jitter(self.config.page_delay_ms);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let url = adapter.page_url(query, page);
        tracing::trace!(engine = %adapter.engine, page, %url, "fetching page");

        let outcome = self
            .fetcher
            .fetch(&url, self.config.fetch_timeout())
            .await
            .into_body()
            .and_then(|body| {
                tracing::trace!(
                    engine = %adapter.engine,
                    page,
                    bytes = body.len(),
                    "page received"
                );
                adapter.extract(&body)
            });
        (page, outcome)
    }
}

/// Random delay in `[min, max]` milliseconds.
fn jitter((min, max): (u64, u64)) -> Duration {
    if max == 0 || min > max {
        return Duration::from_millis(min.min(max));
    }
    Duration::from_millis(rand::thread_rng().gen_range(min..=max))
}

async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
