//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod socket_guard;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renders a results page in the default provider's markup with one result per href.
pub fn results_page(hrefs: &[String]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<li class="b_algo"><h2><a href="{href}">{href}</a></h2><p>snippet</p></li>"#
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html><html><head><title>results</title></head><body>
<div id="b_header"><a href="https://www.bing.com/">home</a></div>
<div id="b_content"><ol id="b_results">{items}</ol></div>
</body></html>"#
    )
}

/// Mounts a GET responder returning `body` at `route`.
pub async fn mount_file(server: &MockServer, route: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Mounts the results page at `/search` listing `hrefs`.
pub async fn mount_results(server: &MockServer, hrefs: &[String]) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .set_body_string(results_page(hrefs)),
        )
        .mount(server)
        .await;
}

/// A URL on a port nothing listens on.
pub fn unreachable_url(file: &str) -> String {
    format!("http://127.0.0.1:9/{file}")
}
