//! Startpage: privacy-focused proxy for Google results.
//!
//! Useful when Google blocks direct scraping. Pages are numbered from 1.

use std::borrow::Cow;

use crate::engine::{EngineAdapter, Layout, RedirectUnwrap, SelectorRule};
use crate::types::EngineId;

pub static ADAPTER: EngineAdapter = EngineAdapter {
    engine: EngineId::Startpage,
    url_template: Cow::Borrowed("https://www.startpage.com/sp/search?query={query}&page={offset}"),
    first_offset: 1,
    page_step: 1,
    default_pages: 5,
    rules: SelectorRule {
        primary: Layout {
            container: ".w-gl__result",
            title: "h3",
            link: "a.w-gl__result-url",
            snippet: Some(".w-gl__description"),
        },
        fallbacks: &[
            Layout {
                container: ".w-gl__result",
                title: ".w-gl__result-title",
                link: ".w-gl__result-title a, a.w-gl__result-title",
                snippet: Some(".w-gl__description"),
            },
            Layout {
                container: "div.result",
                title: ".result-title, h2",
                link: "a.result-link, a[href^=\"http\"]",
                snippet: Some(".description"),
            },
        ],
    },
    unwrap: RedirectUnwrap::Verbatim,
    excluded_links: &["startpage.com/do/", "startpage.com/sp/"],
};
