//! Query composition and provider-specific request URLs.

use url::form_urlencoded;

/// Results endpoint of the default search provider.
pub const BING_ENDPOINT: &str = "http://www.bing.com/search";

/// Structural selector for result anchors in the default provider's markup.
///
/// Tied to the provider's current page layout: if the markup changes, the
/// selector silently matches nothing.
pub const BING_RESULT_SELECTOR: &str = "html body div#b_content ol#b_results li.b_algo h2 a";

/// A search scoped to one site and one file type.
///
/// Neither value is validated; empty strings produce an unscoped clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    site: String,
    file_type: String,
}

impl SearchQuery {
    /// Creates a query for files of `file_type` hosted on `site`.
    #[must_use]
    pub fn new(site: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            file_type: file_type.into(),
        }
    }

    /// Returns the site the query is scoped to.
    #[must_use]
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Returns the file type searched for.
    #[must_use]
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// Returns the raw (unencoded) query text sent to the provider.
    #[must_use]
    pub fn query_string(&self) -> String {
        format!(
            "site:{site} && filetype:{ft} && instreamset:(url title):{ft}",
            site = self.site,
            ft = self.file_type,
        )
    }
}

/// A search provider endpoint plus the selector for its result links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProvider {
    endpoint: String,
    selector: String,
}

impl Default for SearchProvider {
    fn default() -> Self {
        Self::bing()
    }
}

impl SearchProvider {
    /// The default provider.
    #[must_use]
    pub fn bing() -> Self {
        Self::new(BING_ENDPOINT)
    }

    /// A provider at `endpoint` that serves the default provider's markup.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            selector: BING_RESULT_SELECTOR.to_string(),
        }
    }

    /// Returns the results endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the CSS selector matching result anchors.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Builds the results page URL for `query`.
    ///
    /// The query text is form-encoded into the `q` parameter (spaces become `+`).
    #[must_use]
    pub fn request_url(&self, query: &SearchQuery) -> String {
        let encoded: String =
            form_urlencoded::byte_serialize(query.query_string().as_bytes()).collect();
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{separator}q={encoded}", self.endpoint)
    }
}
