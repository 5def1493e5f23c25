//! Search-engine query building and result link extraction.
//!
//! A [`SearchQuery`] scopes a search to one site and one file type. The
//! [`SearchProvider`] turns it into a request URL and knows which part of the
//! rendered results page holds the result links.
//!
//! # Example
//!
//! ```no_run
//! use filesearch_core::download::HttpClient;
//! use filesearch_core::search::{SearchProvider, SearchQuery, fetch_result_links};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = SearchProvider::bing();
//! let query = SearchQuery::new("example.com", "pdf");
//! let url = provider.request_url(&query);
//! let links = fetch_result_links(&HttpClient::new(), &url, provider.selector()).await?;
//! println!("found {} links", links.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod extractor;
mod query;

pub use error::SearchError;
pub use extractor::{ResultLink, extract_links, fetch_result_links};
pub use query::{BING_ENDPOINT, BING_RESULT_SELECTOR, SearchProvider, SearchQuery};
