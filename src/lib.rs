//! omnisearch: command-line front end for the `omni-search` pipeline.
//!
//! This crate owns what sits around the pipeline: TOML configuration,
//! logging setup and the `omnisearch` binary. The search itself lives in
//! the `omni-search` workspace member.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AppConfig, LoggingConfig, SearchSettings};
pub use error::{AppError, Result};
