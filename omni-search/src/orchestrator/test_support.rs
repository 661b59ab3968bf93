//! Scripted page fetcher and fixture markup shared by orchestrator tests.

use std::borrow::Cow;
use std::sync::Mutex;
use std::time::Duration;

use crate::engine::{EngineAdapter, Layout, RedirectUnwrap, SelectorRule};
use crate::transport::{FetchOutcome, PageFetcher};
use crate::types::EngineId;

/// Adapter addressing `http://engine.test/?q=<query>&p=<page>`.
pub(crate) static TEST_ADAPTER: EngineAdapter = EngineAdapter {
    engine: EngineId::Brave,
    url_template: Cow::Borrowed("http://engine.test/?q={query}&p={offset}"),
    first_offset: 0,
    page_step: 1,
    default_pages: 5,
    rules: SelectorRule {
        primary: Layout {
            container: "div.r",
            title: "h3",
            link: "a",
            snippet: Some("p"),
        },
        fallbacks: &[],
    },
    unwrap: RedirectUnwrap::Verbatim,
    excluded_links: &[],
};

/// Zero-based page index encoded in a [`TEST_ADAPTER`] URL.
pub(crate) fn page_of(url: &str) -> usize {
    url.rsplit("p=")
        .next()
        .and_then(|p| p.parse().ok())
        .unwrap_or(usize::MAX)
}

/// A results page with `count` blocks linking to `https://site.test/{page}/{i}`.
pub(crate) fn results_page(page: usize, count: usize) -> String {
    let blocks: String = (0..count)
        .map(|i| {
            format!(
                r#"<div class="r"><h3>Result {page}-{i}</h3><a href="https://site.test/{page}/{i}">x</a><p>snippet {i}</p></div>"#
            )
        })
        .collect();
    format!("<html><body>{blocks}</body></html>")
}

type Responder = Box<dyn Fn(&str) -> (Duration, FetchOutcome) + Send + Sync>;

/// Answers each fetch from a closure and records the requested URLs.
pub(crate) struct ScriptedFetcher {
    respond: Responder,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    /// Responds immediately.
    pub(crate) fn new(respond: impl Fn(&str) -> FetchOutcome + Send + Sync + 'static) -> Self {
        Self::with_latency(move |url| (Duration::ZERO, respond(url)))
    }

    /// Sleeps for the returned duration before answering.
    pub(crate) fn with_latency(
        respond: impl Fn(&str) -> (Duration, FetchOutcome) + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> FetchOutcome {
        self.calls.lock().expect("calls lock").push(url.to_string());
        let (latency, outcome) = (self.respond)(url);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        outcome
    }
}
