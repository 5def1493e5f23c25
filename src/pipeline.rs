//! The linear run: build query, scrape links, download, summarize.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use filesearch_core::pipeline::{RunConfig, run};
//! use filesearch_core::report::Reporter;
//! use filesearch_core::search::SearchQuery;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::new(SearchQuery::new("example.com", "pdf"));
//! let summary = run(&config, Arc::new(Reporter::stdout())).await?;
//! println!("{} of {} saved", summary.report.succeeded(), summary.links_found);
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::download::{
    ConcurrencyLimit, DEFAULT_OUTPUT_DIR, DispatchError, DispatchObserver, DispatchReport,
    Dispatcher, DownloadError, HttpClient, TimeoutPolicy, prepare_output_dir,
};
use crate::report::Reporter;
use crate::search::{SearchProvider, SearchQuery, fetch_result_links};

/// Everything one run needs; built by the binary from CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Site and file type to search for.
    pub query: SearchQuery,
    /// Search endpoint and result selector.
    pub provider: SearchProvider,
    /// Folder receiving the downloads.
    pub output_dir: PathBuf,
    /// Download fan-out limit.
    pub concurrency: ConcurrencyLimit,
    /// Per-request timeout for the search and every download.
    pub timeout: TimeoutPolicy,
}

impl RunConfig {
    /// Default settings for `query`: the default provider, the `downloads`
    /// folder, unbounded fan-out and no timeout.
    #[must_use]
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            provider: SearchProvider::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: ConcurrencyLimit::default(),
            timeout: TimeoutPolicy::default(),
        }
    }
}

/// Errors that stop a run before any download starts.
///
/// Search and per-file failures are never reported here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] DownloadError),

    /// The dispatcher rejected its configuration or lost its semaphore.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Outcome of a whole run.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Request URL sent to the search provider.
    pub search_url: String,
    /// Number of links extracted from the results page.
    pub links_found: usize,
    /// Download results.
    pub report: DispatchReport,
}

/// Runs the whole pipeline, printing progress through `reporter`.
///
/// A failed search counts as zero results; failed downloads are left out of
/// the report. Both are logged.
///
/// # Errors
///
/// Returns [`PipelineError`] if the HTTP client or the dispatcher cannot be
/// constructed from `config`.
#[instrument(skip(config, reporter), fields(site = %config.query.site(), file_type = %config.query.file_type()))]
pub async fn run<W>(
    config: &RunConfig,
    reporter: Arc<Reporter<W>>,
) -> Result<PipelineSummary, PipelineError>
where
    W: Write + Send + 'static,
{
    if let Err(e) = prepare_output_dir(&config.output_dir).await {
        warn!(error = %e, "cannot create output folder; downloads into it will fail");
    }

    let client = HttpClient::with_timeout_policy(config.timeout)?;
    let dispatcher = Dispatcher::new(
        client.clone(),
        config.output_dir.clone(),
        config.concurrency,
    )?;

    let search_url = config.provider.request_url(&config.query);
    info!(url = %search_url, "searching");

    let links = fetch_result_links(&client, &search_url, config.provider.selector())
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "search failed; continuing with no results");
            Vec::new()
        });
    let links_found = links.len();

    reporter.files_to_download(links_found);

    let observer: Arc<dyn DispatchObserver> = reporter.clone();
    let report = dispatcher.dispatch(links, observer).await?;

    reporter.summary(&report);

    Ok(PipelineSummary {
        search_url,
        links_found,
        report,
    })
}
