//! Outbound page fetching with header spoofing and a fallback policy.
//!
//! [`Transport`] wraps a [`Connector`] (one GET, nothing else) with the
//! retry policy:
//!
//! 1. Fetch the URL as given.
//! 2. On a network-level failure (DNS, connect, TLS, timeout) of an `https`
//!    URL, fetch the `http` variant once.
//! 3. Repeat 1–2 up to `retries` more times with a fixed delay.
//!
//! Any HTTP status ends the sequence: a 503 is an answer, not a connection
//! failure. Only 200 counts as [`FetchStatus::Ok`]. Failures never escape as
//! errors; they are folded into the returned [`FetchOutcome`].
//!
//! TLS certificate verification is disabled on the production connector.
//! Engines sit behind middleboxes and odd redirect chains; nothing sent
//! through this client is secret.

use std::future::Future;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Realistic browser User-Agent strings, one picked per fetch.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

/// Browser-like headers sent with every request.
pub const BASELINE_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("DNT", "1"),
    ("Connection", "keep-alive"),
    ("Upgrade-Insecure-Requests", "1"),
    ("Cache-Control", "max-age=0"),
];

/// Select a User-Agent from [`USER_AGENTS`] using `rng`.
pub fn pick_user_agent<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    USER_AGENTS
        .choose(rng)
        .copied()
        // SAFETY: USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}

/// Classification of a finished fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Ok,
    HttpError(u16),
    NetworkError,
    Timeout,
}

/// Result of [`PageFetcher::fetch`]. Consumed immediately by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub status: FetchStatus,
    pub body: Option<String>,
    pub content_type: Option<String>,
}

impl FetchOutcome {
    pub fn ok(body: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            status: FetchStatus::Ok,
            body: Some(body.into()),
            content_type,
        }
    }

    pub fn http_error(code: u16) -> Self {
        Self::bare(FetchStatus::HttpError(code))
    }

    pub fn network_error() -> Self {
        Self::bare(FetchStatus::NetworkError)
    }

    pub fn timeout() -> Self {
        Self::bare(FetchStatus::Timeout)
    }

    fn bare(status: FetchStatus) -> Self {
        Self {
            status,
            body: None,
            content_type: None,
        }
    }

    /// Fold a terminal connector error into an outcome.
    fn from_error(err: &SearchError) -> Self {
        match err {
            SearchError::Timeout(_) => Self::timeout(),
            SearchError::Http(code) => Self::http_error(*code),
            _ => Self::network_error(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == FetchStatus::Ok
    }

    /// The page body, or the error this outcome stands for.
    pub fn into_body(self) -> Result<String, SearchError> {
        match (self.status, self.body) {
            (FetchStatus::Ok, Some(body)) => Ok(body),
            (FetchStatus::Ok, None) => Ok(String::new()),
            (FetchStatus::HttpError(code), _) => Err(SearchError::Http(code)),
            (FetchStatus::NetworkError, _) => {
                Err(SearchError::Network("fetch attempts exhausted".into()))
            }
            (FetchStatus::Timeout, _) => {
                Err(SearchError::Timeout("fetch attempts exhausted".into()))
            }
        }
    }
}

/// A raw HTTP answer from a [`Connector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Read only for status 200.
    pub body: Option<String>,
    pub content_type: Option<String>,
}

impl RawResponse {
    fn into_outcome(self) -> FetchOutcome {
        if self.status == 200 {
            FetchOutcome {
                status: FetchStatus::Ok,
                body: Some(self.body.unwrap_or_default()),
                content_type: self.content_type,
            }
        } else {
            FetchOutcome {
                status: FetchStatus::HttpError(self.status),
                body: self.body,
                content_type: self.content_type,
            }
        }
    }
}

/// Issues a single GET. Errors are [`SearchError::Network`] or
/// [`SearchError::Timeout`]; any HTTP status is a successful answer.
pub trait Connector: Send + Sync {
    fn get(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<RawResponse, SearchError>> + Send;
}

/// Something that can turn a URL into a [`FetchOutcome`].
///
/// [`Transport`] is the production implementation; the paginator and
/// pipeline are generic over this so they can be driven by canned pages.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str, timeout: Duration) -> impl Future<Output = FetchOutcome> + Send;
}

/// reqwest-backed [`Connector`].
#[derive(Debug, Clone)]
pub struct ReqwestConnector {
    client: reqwest::Client,
}

impl ReqwestConnector {
    /// Build a client configured for search engine scraping.
    ///
    /// The client has:
    /// - No cookie store, so nothing set by one search reaches the next
    /// - Certificate verification disabled
    /// - Redirects followed, up to 10 hops
    /// - Brotli, gzip and deflate decompression
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the client cannot be constructed.
    pub fn new() -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Connector for ReqwestConnector {
    async fn get(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<RawResponse, SearchError> {
        let mut request = self
            .client
            .get(url)
            .timeout(timeout)
            .header(USER_AGENT, user_agent);
        for (name, value) in BASELINE_HEADERS {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = if status == 200 {
            Some(response.text().await.map_err(classify)?)
        } else {
            None
        };

        Ok(RawResponse {
            status,
            body,
            content_type,
        })
    }
}

fn classify(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout(err.to_string())
    } else {
        SearchError::Network(err.to_string())
    }
}

/// The `http` variant of an `https` URL, `None` for anything else.
pub fn downgrade_scheme(url: &str) -> Option<String> {
    let prefix = url.get(..8)?;
    prefix
        .eq_ignore_ascii_case("https://")
        .then(|| format!("http://{}", &url[8..]))
}

/// Fallback-policy fetcher over a [`Connector`].
#[derive(Debug, Clone)]
pub struct Transport<C = ReqwestConnector> {
    connector: C,
    retries: u32,
    retry_delay: Duration,
    user_agent: Option<String>,
}

/// The production transport.
pub type HttpTransport = Transport<ReqwestConnector>;

impl HttpTransport {
    /// Build a reqwest-backed transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Transport::with_connector(ReqwestConnector::new()?, config))
    }
}

impl<C: Connector> Transport<C> {
    pub fn with_connector(connector: C, config: &SearchConfig) -> Self {
        Self {
            connector,
            retries: config.retries,
            retry_delay: config.retry_delay(),
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn choose_user_agent(&self) -> String {
        match self.user_agent {
            Some(ref custom) => custom.clone(),
            None => pick_user_agent(&mut rand::thread_rng()).to_owned(),
        }
    }

    /// One pass: the URL as given, then the `http` downgrade on a
    /// network-level failure.
    async fn attempt_sequence(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<FetchOutcome, SearchError> {
        match self.connector.get(url, user_agent, timeout).await {
            Ok(raw) => Ok(raw.into_outcome()),
            Err(err) => {
                let Some(fallback) = downgrade_scheme(url) else {
                    return Err(err);
                };
                tracing::debug!(error = %err, "https fetch failed, retrying over http");
                let raw = self.connector.get(&fallback, user_agent, timeout).await?;
                Ok(raw.into_outcome())
            }
        }
    }
}

impl<C: Connector> PageFetcher for Transport<C> {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchOutcome {
        let user_agent = self.choose_user_agent();
        let mut attempt: u32 = 0;

        loop {
            let err = match self.attempt_sequence(url, &user_agent, timeout).await {
                Ok(outcome) => {
                    tracing::trace!(status = ?outcome.status, "fetch finished");
                    return outcome;
                }
                Err(err) => err,
            };

            if !err.is_retryable() || attempt >= self.retries {
                tracing::debug!(error = %err, attempts = attempt + 1, "fetch gave up");
                return FetchOutcome::from_error(&err);
            }

            attempt += 1;
            tracing::debug!(error = %err, attempt, "fetch failed, retrying");
            if !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
    }
}
