//! Search orchestrator: pagination, dedup, scoring, ranking.
//!
//! This module drives one engine across its result pages, removes
//! duplicate URLs, scores records against the query keywords and returns a
//! sorted, truncated result set.

pub mod dedup;
pub mod paginate;
pub mod scoring;
pub mod search;
pub mod url_normalize;

#[cfg(test)]
pub(crate) mod test_support;
