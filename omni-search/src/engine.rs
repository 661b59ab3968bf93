//! Static per-engine configuration.
//!
//! An [`EngineAdapter`] binds an engine to how its result pages are
//! addressed (URL template, pagination step) and how they are read
//! (selector layouts, redirect unwrapping). Adapters are `static` items in
//! [`crate::engines`]; nothing about them changes after startup.
//!
//! Engine markup drifts with rollouts and A/B tests, so each engine carries
//! an ordered list of alternative [`Layout`]s. The extractor tries them in
//! order and the first one that yields a record wins.

use std::borrow::Cow;

use url::form_urlencoded;

use crate::engines;
use crate::error::SearchError;
use crate::types::{EngineId, SearchResult};

/// One way of reading a result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Selects one element per organic result.
    pub container: &'static str,
    /// Selects the title element within a container.
    pub title: &'static str,
    /// Selects the element carrying the result `href` within a container.
    pub link: &'static str,
    /// Selects the snippet within a container, if the engine has one.
    pub snippet: Option<&'static str>,
}

/// Primary layout plus fallbacks, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorRule {
    pub primary: Layout,
    pub fallbacks: &'static [Layout],
}

impl SelectorRule {
    /// All layouts, primary first.
    pub fn layouts(&self) -> impl Iterator<Item = &Layout> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }
}

/// How an engine wraps outbound links in its own redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectUnwrap {
    /// Links point at their target directly.
    Verbatim,
    /// When `marker` occurs in the href, the real target is the
    /// percent-encoded query parameter `name`.
    QueryParam {
        marker: &'static str,
        name: &'static str,
    },
}

impl RedirectUnwrap {
    /// Recover the destination of `href`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Extraction`] if `href` is wrapped but the
    /// parameter is missing or does not decode to UTF-8.
    pub fn unwrap(&self, href: &str) -> Result<String, SearchError> {
        match *self {
            Self::Verbatim => Ok(href.to_string()),
            Self::QueryParam { marker, name } => {
                if !href.contains(marker) {
                    return Ok(href.to_string());
                }
                let raw = find_query_param(href, name).ok_or_else(|| {
                    SearchError::Extraction(format!("wrapped link without {name}= parameter"))
                })?;
                urlencoding::decode(raw)
                    .map(Cow::into_owned)
                    .map_err(|e| SearchError::Extraction(format!("undecodable {name}= value: {e}")))
            }
        }
    }
}

/// Raw (still encoded) value of query parameter `name` in `href`.
fn find_query_param<'a>(href: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Everything needed to page through and read one engine.
#[derive(Debug, Clone)]
pub struct EngineAdapter {
    pub engine: EngineId,
    /// Page URL with `{query}` and `{offset}` placeholders.
    pub url_template: Cow<'static, str>,
    /// Offset of the first page.
    pub first_offset: usize,
    /// Offset increment per page.
    pub page_step: usize,
    /// Pages fetched when the configuration does not override it.
    pub default_pages: usize,
    pub rules: SelectorRule,
    pub unwrap: RedirectUnwrap,
    /// Destinations containing any of these are navigation, not results.
    pub excluded_links: &'static [&'static str],
}

impl EngineAdapter {
    /// The built-in adapter for `engine`.
    pub fn for_engine(engine: EngineId) -> &'static EngineAdapter {
        match engine {
            EngineId::DuckDuckGo => &engines::duckduckgo::ADAPTER,
            EngineId::Google => &engines::google::ADAPTER,
            EngineId::Brave => &engines::brave::ADAPTER,
            EngineId::Startpage => &engines::startpage::ADAPTER,
        }
    }

    /// A copy of this adapter addressing pages through `template` instead.
    ///
    /// Used to point an engine at a mirror or a local test server.
    pub fn with_url_template(&self, template: impl Into<String>) -> EngineAdapter {
        EngineAdapter {
            url_template: Cow::Owned(template.into()),
            ..self.clone()
        }
    }

    /// Offset parameter for zero-based page index `page`.
    pub fn offset(&self, page: usize) -> usize {
        self.first_offset + page * self.page_step
    }

    /// URL of result page `page` for `query`, query form-encoded.
    pub fn page_url(&self, query: &str, page: usize) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.url_template
            .replace("{query}", &encoded)
            .replace("{offset}", &self.offset(page).to_string())
    }

    /// Extract candidates from one result page. See [`crate::extract`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Extraction`] if one of the adapter's selectors
    /// is malformed.
    pub fn extract(&self, markup: &str) -> Result<Vec<SearchResult>, SearchError> {
        crate::extract::extract(self, markup)
    }
}
