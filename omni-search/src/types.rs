//! Core types: engine identifiers, queries, result records and responses.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SearchError;
use crate::orchestrator::scoring::extract_keywords;

/// A single search result record.
///
/// Field names on the wire (`engine`, `relevance_score`, ...) are part of the
/// external JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// Absolute http(s) URL of the result. This is the dedup key.
    pub url: String,
    /// Host of `url` with a leading `www.` removed.
    pub display_url: String,
    /// Text snippet summarising the page, possibly empty.
    pub snippet: String,
    /// Which engine produced this record.
    #[serde(rename = "engine")]
    pub source_engine: EngineId,
    /// Keyword relevance assigned by the ranker. Zero until ranked.
    pub relevance_score: u32,
    /// Whether this record came from an instant-answer box.
    #[serde(rename = "is_instant", default, skip_serializing_if = "is_false")]
    pub is_instant_answer: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SearchResult {
    /// Build an unscored candidate, validating `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Extraction`] if the title is empty or the URL is
    /// not an absolute http(s) URL with a host.
    pub fn candidate(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        engine: EngineId,
    ) -> Result<Self, SearchError> {
        let title = title.into();
        let url = url.into();
        if title.is_empty() {
            return Err(SearchError::Extraction("candidate has no title".into()));
        }
        if !url.starts_with("http") {
            return Err(SearchError::Extraction(format!(
                "candidate URL is not http(s): {url}"
            )));
        }
        let display_url = display_host(&url)?;
        Ok(Self {
            title,
            url,
            display_url,
            snippet: snippet.into(),
            source_engine: engine,
            relevance_score: 0,
            is_instant_answer: false,
        })
    }
}

/// Host part of `url` with a leading `www.` stripped.
fn display_host(url: &str) -> Result<String, SearchError> {
    let parsed =
        Url::parse(url).map_err(|e| SearchError::Extraction(format!("bad URL {url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SearchError::Extraction(format!(
            "unsupported scheme in {url}"
        )));
    }
    let host = parsed
        .host_str()
        .ok_or_else(|| SearchError::Extraction(format!("URL has no host: {url}")))?;
    Ok(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Search engines the pipeline knows how to scrape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineId {
    /// DuckDuckGo HTML endpoint. Most scraper-friendly; the default.
    #[default]
    DuckDuckGo,
    /// Google web search. Best results, aggressive bot detection.
    Google,
    /// Brave Search, independent index.
    Brave,
    /// Startpage, proxied Google results.
    Startpage,
}

impl EngineId {
    /// The wire identifier (`duckduckgo`, `google`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "duckduckgo",
            Self::Google => "google",
            Self::Brave => "brave",
            Self::Startpage => "startpage",
        }
    }

    /// Human-readable engine name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Google => "Google",
            Self::Brave => "Brave",
            Self::Startpage => "Startpage",
        }
    }

    /// Returns all engine variants.
    pub fn all() -> &'static [EngineId] {
        &[Self::DuckDuckGo, Self::Google, Self::Brave, Self::Startpage]
    }

    /// Lenient lookup: unrecognised selectors fall back to the default engine.
    pub fn resolve(selector: &str) -> Self {
        selector.parse().unwrap_or_else(|_| {
            tracing::debug!(selector, "unknown engine selector, using default");
            Self::default()
        })
    }
}

impl FromStr for EngineId {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|engine| engine.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SearchError::Config(format!("unknown engine: {wanted}")))
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated user query bound to one engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw_text: String,
    engine: EngineId,
}

impl Query {
    /// Trim and validate `raw_text`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] if the trimmed text is empty.
    pub fn new(raw_text: &str, engine: EngineId) -> Result<Self, SearchError> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Err(SearchError::Validation("query must not be empty".into()));
        }
        Ok(Self {
            raw_text: trimmed.to_string(),
            engine,
        })
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn engine(&self) -> EngineId {
        self.engine
    }

    /// Lower-cased query tokens longer than two characters.
    pub fn keywords(&self) -> Vec<String> {
        extract_keywords(&self.raw_text)
    }
}

/// The response handed to the request-handling layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// `true` when at least one result was found.
    pub success: bool,
    pub query: String,
    pub engine: EngineId,
    pub results: Vec<SearchResult>,
    pub total_count: usize,
    pub timestamp: DateTime<Utc>,
    /// Reason for a request-level failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when cancellation or the search deadline cut pagination short.
    #[serde(default, skip_serializing_if = "is_false")]
    pub interrupted: bool,
}

impl SearchResponse {
    /// Wrap ranked results. `success` mirrors `total_count > 0`.
    pub fn from_results(
        query: impl Into<String>,
        engine: EngineId,
        results: Vec<SearchResult>,
        interrupted: bool,
    ) -> Self {
        let total_count = results.len();
        Self {
            success: total_count > 0,
            query: query.into(),
            engine,
            results,
            total_count,
            timestamp: Utc::now(),
            error: None,
            interrupted,
        }
    }

    /// A failed response carrying `error`'s message and no results.
    pub fn failure(query: impl Into<String>, engine: EngineId, error: &SearchError) -> Self {
        Self {
            success: false,
            query: query.into(),
            engine,
            results: Vec::new(),
            total_count: 0,
            timestamp: Utc::now(),
            error: Some(error.to_string()),
            interrupted: matches!(error, SearchError::Timeout(_)),
        }
    }
}
