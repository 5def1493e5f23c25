//! Filesearch Core Library
//!
//! Searches one site for files of one type through a search engine, then
//! downloads every result link concurrently into a local folder.
//!
//! # Architecture
//!
//! The run is a straight pipeline:
//! - [`search`] - Query building and result link extraction
//! - [`download`] - Concurrent streaming downloads
//! - [`report`] - Progress and summary output
//! - [`pipeline`] - Wires the steps together from a [`RunConfig`]

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod pipeline;
pub mod report;
pub mod search;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use download::{
    ConcurrencyLimit, DEFAULT_OUTPUT_DIR, DispatchError, DispatchObserver, DispatchReport,
    Dispatcher, DownloadError, DownloadOutcome, HttpClient, MAX_CONCURRENCY, MAX_TIMEOUT_SECS,
    TimeoutPolicy,
};
pub use pipeline::{PipelineError, PipelineSummary, RunConfig, run};
pub use report::Reporter;
pub use search::{ResultLink, SearchError, SearchProvider, SearchQuery};
