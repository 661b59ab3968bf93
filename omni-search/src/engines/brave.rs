//! Brave Search: independent index, good quality results.
//!
//! Brave has its own crawler, making it a useful source independent from
//! Google/Bing. Links are not redirect-wrapped. `offset=` is a page index.

use std::borrow::Cow;

use crate::engine::{EngineAdapter, Layout, RedirectUnwrap, SelectorRule};
use crate::types::EngineId;

pub static ADAPTER: EngineAdapter = EngineAdapter {
    engine: EngineId::Brave,
    url_template: Cow::Borrowed("https://search.brave.com/search?q={query}&offset={offset}"),
    first_offset: 0,
    page_step: 1,
    default_pages: 5,
    rules: SelectorRule {
        primary: Layout {
            container: "div.snippet",
            title: ".snippet-title, .title",
            link: "a.result-header, .title a, a.heading-serpresult",
            snippet: Some(".snippet-description, .snippet-content"),
        },
        fallbacks: &[Layout {
            container: "div[data-type=\"web\"]",
            title: ".search-snippet-title, .title",
            link: "a[href^=\"http\"]",
            snippet: Some(".generic-snippet .content, .snippet-description"),
        }],
    },
    unwrap: RedirectUnwrap::Verbatim,
    excluded_links: &["search.brave.com/search"],
};
