//! Result link extraction from a rendered results page.

use std::fmt;

use scraper::{Html, Selector};
use tracing::{debug, instrument};

use super::SearchError;
use crate::download::HttpClient;

/// A link taken from the results page, assumed to point at a downloadable file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultLink(String);

impl ResultLink {
    /// Wraps a raw URL string.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the URL as written in the page.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ResultLink {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl From<&str> for ResultLink {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}

/// Returns the `href` of every element matching `selector`, in document order.
///
/// Matches without an `href` are skipped. Duplicates are kept.
///
/// # Errors
///
/// Returns [`SearchError::Selector`] if `selector` is not valid CSS.
pub fn extract_links(html: &str, selector: &str) -> Result<Vec<ResultLink>, SearchError> {
    let parsed =
        Selector::parse(selector).map_err(|e| SearchError::selector(selector, e.to_string()))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&parsed)
        .filter_map(|element| element.value().attr("href"))
        .map(ResultLink::from)
        .collect())
}

/// Fetches the results page at `url` and extracts its result links.
///
/// # Errors
///
/// Returns [`SearchError`] if the page cannot be fetched, answers with a
/// non-success status, or the selector is invalid.
#[instrument(skip(client, selector), fields(url = %url))]
pub async fn fetch_result_links(
    client: &HttpClient,
    url: &str,
    selector: &str,
) -> Result<Vec<ResultLink>, SearchError> {
    debug!("fetching results page");

    let response = client
        .inner()
        .get(url)
        .send()
        .await
        .map_err(|e| SearchError::network(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::http_status(url, status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SearchError::body(url, e))?;
    debug!(bytes = body.len(), "results page received");

    // Html is not Send, so parsing stays out of any await point.
    let links = extract_links(&body, selector)?;
    debug!(count = links.len(), "extracted result links");
    Ok(links)
}
