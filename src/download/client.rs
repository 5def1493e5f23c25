//! HTTP client wrapper for fetching pages and streaming files to disk.
//!
//! A download is split in two steps: [`HttpClient::start_download`] sends the
//! request and names the file from the final URL, and
//! [`PendingDownload::save_to`] streams the body into the output folder.
//! The split lets callers report a file before its body is copied.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::error::DownloadError;
use super::filename::file_name_from_url;
use crate::user_agent;

/// How long a single request may take before it is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// Requests may block indefinitely.
    #[default]
    None,
    /// Each request, including its body, must finish within the duration.
    PerRequest(Duration),
}

impl TimeoutPolicy {
    /// Builds a policy from an optional number of seconds.
    #[must_use]
    pub fn from_secs(secs: Option<u64>) -> Self {
        secs.map_or(Self::None, |secs| Self::PerRequest(Duration::from_secs(secs)))
    }

    /// Returns the timeout, if any.
    #[must_use]
    pub fn duration(self) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::PerRequest(duration) => Some(duration),
        }
    }
}

/// HTTP client shared by the search and download steps.
///
/// Created once and cloned into each download task; clones share one
/// connection pool. Redirects are followed, so file names come from the
/// final URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: TimeoutPolicy,
}

/// Metadata for a file saved to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Local file name inside the output folder.
    pub file_name: String,
    /// Full path of the saved file.
    pub path: PathBuf,
    /// Number of body bytes written.
    pub bytes: u64,
}

/// A successful response whose body has not been copied yet.
#[derive(Debug)]
pub struct PendingDownload {
    url: String,
    file_name: String,
    response: reqwest::Response,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with no request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    /// This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeout_policy(TimeoutPolicy::None)
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a client that applies `timeout` to every request.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the TLS backend or system
    /// configuration cannot be initialized.
    #[instrument(level = "debug")]
    pub fn with_timeout_policy(timeout: TimeoutPolicy) -> Result<Self, DownloadError> {
        let mut builder = Client::builder()
            .gzip(true)
            .user_agent(user_agent::default_user_agent());
        if let Some(duration) = timeout.duration() {
            builder = builder.timeout(duration);
        }
        let client = builder.build().map_err(DownloadError::client_build)?;
        Ok(Self { client, timeout })
    }

    /// Returns the timeout policy the client was built with.
    #[must_use]
    pub fn timeout_policy(&self) -> TimeoutPolicy {
        self.timeout
    }

    /// Sends a GET for `url` and resolves the local file name.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - The final URL has no path segment to name the file after
    #[instrument(skip(self), fields(url = %url))]
    pub async fn start_download(&self, url: &str) -> Result<PendingDownload, DownloadError> {
        debug!("starting download");

        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let final_url = response.url();
        let file_name = file_name_from_url(final_url)
            .ok_or_else(|| DownloadError::no_file_name(final_url.as_str()))?;
        debug!(final_url = %final_url, file_name = %file_name, "resolved file name");

        Ok(PendingDownload {
            url: url.to_string(),
            file_name,
            response,
        })
    }

    /// Downloads `url` into `output_dir` in one step.
    ///
    /// An existing file with the same name is overwritten.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`start_download`](Self::start_download) and
    /// [`PendingDownload::save_to`].
    pub async fn download_to_dir(
        &self,
        url: &str,
        output_dir: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        self.start_download(url).await?.save_to(output_dir).await
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

impl PendingDownload {
    /// Returns the file name the body will be saved under.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the requested URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Streams the body into `output_dir/<file_name>`, creating or truncating it.
    ///
    /// A failure partway through leaves the partial file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Io`] if the file cannot be created or written,
    /// or [`DownloadError::Network`]/[`DownloadError::Timeout`] if the body
    /// stream breaks.
    pub async fn save_to(self, output_dir: &Path) -> Result<DownloadOutcome, DownloadError> {
        self.save_to_notifying(output_dir, |_| {}).await
    }

    /// Like [`save_to`](Self::save_to), calling `on_created` with the file
    /// name once the file is open and before any body bytes are written.
    ///
    /// # Errors
    ///
    /// Same as [`save_to`](Self::save_to); `on_created` is not called when
    /// the file cannot be created.
    #[instrument(skip(self, on_created), fields(url = %self.url, file_name = %self.file_name))]
    pub async fn save_to_notifying(
        self,
        output_dir: &Path,
        on_created: impl FnOnce(&str) + Send,
    ) -> Result<DownloadOutcome, DownloadError> {
        let path = output_dir.join(&self.file_name);

        let mut file = File::create(&path)
            .await
            .map_err(|e| DownloadError::io(path.clone(), e))?;
        on_created(&self.file_name);

        let bytes = stream_to_file(&mut file, self.response, &self.url, &path).await?;

        info!(path = %path.display(), bytes, "download complete");

        Ok(DownloadOutcome {
            file_name: self.file_name,
            path,
            bytes,
        })
    }
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = match chunk_result {
            Ok(chunk) => chunk,
            Err(e) => {
                // Keep what arrived on disk.
                if let Err(flush_err) = writer.flush().await {
                    debug!(path = %file_path.display(), error = %flush_err, "flush after broken body failed");
                }
                return Err(DownloadError::network(url, e));
            }
        };

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

/// Creates the output folder (and parents) if absent.
///
/// On Unix a new folder gets mode `0755` (subject to the process umask).
/// An existing folder is left untouched.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] if the folder cannot be created.
pub async fn prepare_output_dir(path: &Path) -> Result<(), DownloadError> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(super::constants::OUTPUT_DIR_MODE);

    builder
        .create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    debug!(path = %path.display(), "output folder ready");
    Ok(())
}
