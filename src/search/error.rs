//! Error types for the search module.

use thiserror::Error;

/// Errors raised while fetching or reading a search results page.
///
/// Callers in the pipeline treat every variant as "no results"; the variants
/// exist so the degradation is logged with a precise cause.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network-level failure reaching the provider.
    #[error("network error fetching results page {url}: {source}")]
    Network {
        /// Results page URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded the configured timeout.
    #[error("timeout fetching results page {url}")]
    Timeout {
        /// Results page URL.
        url: String,
    },

    /// The provider answered with a non-success status.
    #[error("HTTP {status} fetching results page {url}")]
    HttpStatus {
        /// Results page URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be read as text.
    #[error("failed to read results page body from {url}: {source}")]
    Body {
        /// Results page URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The result selector is not valid CSS.
    #[error("invalid result selector `{selector}`: {message}")]
    Selector {
        /// Selector text.
        selector: String,
        /// Parser message.
        message: String,
    },
}

impl SearchError {
    /// Creates a network error, promoting timeouts to [`SearchError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a body read error, promoting timeouts to [`SearchError::Timeout`].
    pub fn body(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Body {
            url: url.into(),
            source,
        }
    }

    /// Creates a selector error.
    pub fn selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.into(),
        }
    }
}
