//! DuckDuckGo: most scraper-friendly, privacy-aligned.
//!
//! Uses the HTML-only endpoint at `https://html.duckduckgo.com/html/`,
//! which requires no JavaScript. Pages advance by 30 results via `s=`.
//! Outbound links are wrapped as `//duckduckgo.com/l/?uddg=<target>&rut=...`.

use std::borrow::Cow;

use crate::engine::{EngineAdapter, Layout, RedirectUnwrap, SelectorRule};
use crate::types::EngineId;

/// Ad blocks carry `result--ad` on the outer `.result` wrapper.
pub static ADAPTER: EngineAdapter = EngineAdapter {
    engine: EngineId::DuckDuckGo,
    url_template: Cow::Borrowed("https://html.duckduckgo.com/html/?q={query}&s={offset}"),
    first_offset: 0,
    page_step: 30,
    default_pages: 5,
    rules: SelectorRule {
        primary: Layout {
            container: ".result:not(.result--ad) .result__body",
            title: ".result__a",
            link: ".result__a",
            snippet: Some(".result__snippet"),
        },
        fallbacks: &[
            Layout {
                container: ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
                title: ".result__a",
                link: ".result__a",
                snippet: Some(".result__snippet"),
            },
            Layout {
                container: ".links_main",
                title: "a",
                link: "a[href]",
                snippet: Some(".result__snippet"),
            },
        ],
    },
    unwrap: RedirectUnwrap::QueryParam {
        marker: "uddg=",
        name: "uddg",
    },
    excluded_links: &["duckduckgo.com/y.js"],
};
