//! Per-engine adapters.
//!
//! Each module exposes a static [`crate::engine::EngineAdapter`] describing
//! how to page through and read that engine's HTML results.

pub mod brave;
pub mod duckduckgo;
pub mod google;
pub mod startpage;
