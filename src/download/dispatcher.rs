//! Fan-out of result links into concurrent download tasks.
//!
//! # Concurrency Model
//!
//! - Each link runs in its own Tokio task
//! - With [`ConcurrencyLimit::Bounded`], a semaphore permit is acquired before
//!   each spawn and released when the task ends (RAII)
//! - Successful tasks send their [`DownloadOutcome`] into an mpsc channel
//!   sized to the number of links, so a send never waits on the reader
//! - The dispatcher awaits every task handle, drops the last sender, then
//!   drains the channel; the reader therefore sees exactly one entry per
//!   success and then ends
//!
//! No retries, no cancellation. A hung request blocks its task and the join
//! unless the client carries a [`TimeoutPolicy`](super::TimeoutPolicy).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, instrument, warn};

use super::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::{DownloadError, DownloadOutcome, HttpClient};
use crate::search::ResultLink;

/// Receives progress notifications from running download tasks.
///
/// Called concurrently from many tasks, so implementations synchronize
/// internally.
pub trait DispatchObserver: Send + Sync {
    /// `file_name` was created in the output folder and its body is about to be copied.
    fn file_started(&self, _file_name: &str) {}

    /// A file was saved completely.
    fn file_saved(&self, _outcome: &DownloadOutcome) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl DispatchObserver for SilentObserver {}

/// How many downloads may run at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyLimit {
    /// One task per link, all started immediately.
    #[default]
    Unbounded,
    /// At most this many downloads in flight.
    Bounded(usize),
}

impl ConcurrencyLimit {
    /// `None` maps to [`ConcurrencyLimit::Unbounded`].
    #[must_use]
    pub fn from_option(limit: Option<usize>) -> Self {
        limit.map_or(Self::Unbounded, Self::Bounded)
    }
}

/// Error type for dispatcher operations.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Result of one dispatch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    attempted: usize,
    downloaded: Vec<DownloadOutcome>,
}

impl DispatchReport {
    /// Creates a report for `attempted` links of which `downloaded` were saved.
    #[must_use]
    pub fn new(attempted: usize, downloaded: Vec<DownloadOutcome>) -> Self {
        Self {
            attempted,
            downloaded,
        }
    }

    /// Number of links a download was attempted for.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Saved files, in completion order.
    #[must_use]
    pub fn downloaded(&self) -> &[DownloadOutcome] {
        &self.downloaded
    }

    /// Number of files saved.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.downloaded.len()
    }

    /// Number of links that produced no file.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted.saturating_sub(self.downloaded.len())
    }

    /// Names of the saved files, in completion order.
    #[must_use]
    pub fn file_names(&self) -> Vec<&str> {
        self.downloaded
            .iter()
            .map(|outcome| outcome.file_name.as_str())
            .collect()
    }
}

/// Downloads result links concurrently into one output folder.
#[derive(Debug)]
pub struct Dispatcher {
    client: HttpClient,
    output_dir: PathBuf,
    limit: ConcurrencyLimit,
    semaphore: Option<Arc<Semaphore>>,
}

impl Dispatcher {
    /// Creates a dispatcher writing into `output_dir`.
    ///
    /// The folder is not created here; see
    /// [`prepare_output_dir`](super::prepare_output_dir).
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidConcurrency`] if a bounded limit is
    /// outside 1-100.
    #[instrument(level = "debug", skip(client, output_dir))]
    pub fn new(
        client: HttpClient,
        output_dir: impl Into<PathBuf>,
        limit: ConcurrencyLimit,
    ) -> Result<Self, DispatchError> {
        let semaphore = match limit {
            ConcurrencyLimit::Unbounded => None,
            ConcurrencyLimit::Bounded(value) => {
                if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&value) {
                    return Err(DispatchError::InvalidConcurrency { value });
                }
                Some(Arc::new(Semaphore::new(value)))
            }
        };

        Ok(Self {
            client,
            output_dir: output_dir.into(),
            limit,
            semaphore,
        })
    }

    /// Returns the output folder.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> ConcurrencyLimit {
        self.limit
    }

    /// Downloads every link and waits for all of them to finish.
    ///
    /// Per-link failures are logged and leave no entry in the report.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::SemaphoreClosed`] if the concurrency
    /// semaphore is closed.
    #[instrument(skip(self, links, observer), fields(links = links.len(), output_dir = %self.output_dir.display()))]
    pub async fn dispatch(
        &self,
        links: Vec<ResultLink>,
        observer: Arc<dyn DispatchObserver>,
    ) -> Result<DispatchReport, DispatchError> {
        let attempted = links.len();
        // tokio channels reject a zero capacity
        let (tx, mut rx) = mpsc::channel(attempted.max(1));
        let mut handles = Vec::with_capacity(attempted);

        info!(attempted, "starting downloads");

        for link in links {
            let permit = match &self.semaphore {
                Some(semaphore) => Some(
                    Arc::clone(semaphore)
                        .acquire_owned()
                        .await
                        .map_err(|_| DispatchError::SemaphoreClosed)?,
                ),
                None => None,
            };

            let client = self.client.clone();
            let output_dir = self.output_dir.clone();
            let observer = Arc::clone(&observer);
            let tx = tx.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;

                match download_link(&client, &link, &output_dir, observer.as_ref()).await {
                    Ok(outcome) => {
                        observer.file_saved(&outcome);
                        if tx.send(outcome).await.is_err() {
                            warn!(url = %link, "outcome receiver dropped");
                        }
                    }
                    Err(e) => {
                        warn!(url = %link, error = %e, "download failed");
                    }
                }
            }));
        }
        drop(tx);

        debug!(
            task_count = handles.len(),
            "waiting for downloads to complete"
        );

        for handle in handles {
            // A panicked task sent nothing, so it counts as a failure.
            if let Err(e) = handle.await {
                warn!(error = %e, "download task panicked");
            }
        }

        let mut downloaded = Vec::with_capacity(attempted);
        while let Some(outcome) = rx.recv().await {
            downloaded.push(outcome);
        }

        let report = DispatchReport::new(attempted, downloaded);
        info!(
            attempted,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "downloads finished"
        );
        Ok(report)
    }
}

async fn download_link(
    client: &HttpClient,
    link: &ResultLink,
    output_dir: &Path,
    observer: &dyn DispatchObserver,
) -> Result<DownloadOutcome, DownloadError> {
    client
        .start_download(link.as_str())
        .await?
        .save_to_notifying(output_dir, |file_name| observer.file_started(file_name))
        .await
}
