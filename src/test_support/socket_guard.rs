use std::net::TcpListener;

use wiremock::MockServer;

/// Starts a mock server, or returns `None` when localhost sockets are unavailable.
///
/// Panics instead of skipping when `FILESEARCH_REQUIRE_SOCKET_TESTS` is set to a truthy value.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return Some(MockServer::start().await);
    }

    let required = std::env::var("FILESEARCH_REQUIRE_SOCKET_TESTS")
        .is_ok_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));
    assert!(
        !required,
        "[socket-bound-test] cannot bind localhost socket; FILESEARCH_REQUIRE_SOCKET_TESTS is set"
    );
    eprintln!("[socket-bound-test] cannot bind localhost socket; skipping wiremock-based unit test");
    None
}
