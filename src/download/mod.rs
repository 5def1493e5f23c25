//! Concurrent streaming downloads of result links into a local folder.
//!
//! # Features
//!
//! - One task per link, optionally gated by a semaphore
//! - Streaming bodies straight to disk
//! - File names taken from the final (post-redirect) URL
//! - Per-link failures are logged and never abort the batch
//! - Optional per-request timeout (none by default)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use filesearch_core::download::{
//!     ConcurrencyLimit, Dispatcher, HttpClient, SilentObserver, prepare_output_dir,
//! };
//! use filesearch_core::search::ResultLink;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! prepare_output_dir("downloads".as_ref()).await?;
//! let dispatcher = Dispatcher::new(HttpClient::new(), "downloads", ConcurrencyLimit::Unbounded)?;
//! let links = vec![ResultLink::new("https://example.com/report.pdf")];
//! let report = dispatcher.dispatch(links, Arc::new(SilentObserver)).await?;
//! println!("saved {} of {}", report.succeeded(), report.attempted());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod dispatcher;
mod error;
mod filename;

pub use client::{DownloadOutcome, HttpClient, PendingDownload, TimeoutPolicy, prepare_output_dir};
pub use constants::{DEFAULT_OUTPUT_DIR, MAX_CONCURRENCY, MAX_TIMEOUT_SECS, MIN_CONCURRENCY};
pub use dispatcher::{
    ConcurrencyLimit, DispatchError, DispatchObserver, DispatchReport, Dispatcher, SilentObserver,
};
pub use error::DownloadError;
pub use filename::file_name_from_url;

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
