//! Integration tests for the download dispatcher.
//!
//! These tests verify the full fan-out/collect flow with mock HTTP servers.

mod support;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use filesearch_core::download::{
    ConcurrencyLimit, Dispatcher, HttpClient, SilentObserver, prepare_output_dir,
};
use filesearch_core::search::ResultLink;
use support::socket_guard::{should_skip_socket_bound_test, start_mock_server_or_skip};
use support::{mount_file, unreachable_url};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn links_for(server: &MockServer, names: &[&str]) -> Vec<ResultLink> {
    names
        .iter()
        .map(|name| ResultLink::new(format!("{}/files/{name}", server.uri())))
        .collect()
}

fn dispatcher(output_dir: &std::path::Path, limit: ConcurrencyLimit) -> Dispatcher {
    Dispatcher::new(HttpClient::new(), output_dir, limit).expect("valid dispatcher")
}

#[tokio::test]
async fn test_dispatch_all_success_saves_every_file() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let names = ["a.pdf", "b.pdf", "c.pdf", "d.pdf"];
    for name in names {
        mount_file(&mock_server, &format!("/files/{name}"), name.as_bytes()).await;
    }

    let report = dispatcher(temp_dir.path(), ConcurrencyLimit::Unbounded)
        .dispatch(links_for(&mock_server, &names), Arc::new(SilentObserver))
        .await
        .expect("dispatch should not error");

    assert_eq!(report.attempted(), names.len());
    assert_eq!(report.succeeded(), names.len());
    let saved: BTreeSet<&str> = report.file_names().into_iter().collect();
    let expected: BTreeSet<&str> = names.into_iter().collect();
    assert_eq!(saved, expected);

    for name in names {
        let content = std::fs::read(temp_dir.path().join(name)).expect("file should exist");
        assert_eq!(content, name.as_bytes());
    }
}

#[tokio::test]
async fn test_dispatch_one_unreachable_link_keeps_others() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    mount_file(&mock_server, "/files/ok1.docx", b"one").await;
    mount_file(&mock_server, "/files/ok2.docx", b"two").await;

    let mut links = links_for(&mock_server, &["ok1.docx", "ok2.docx"]);
    links.insert(1, ResultLink::new(unreachable_url("lost.docx")));

    let report = dispatcher(temp_dir.path(), ConcurrencyLimit::Unbounded)
        .dispatch(links, Arc::new(SilentObserver))
        .await
        .expect("per-link failures must not fail the batch");

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.failed(), 1);
    let saved: BTreeSet<&str> = report.file_names().into_iter().collect();
    assert_eq!(saved, BTreeSet::from(["ok1.docx", "ok2.docx"]));
    assert!(!temp_dir.path().join("lost.docx").exists());
}

#[tokio::test]
async fn test_dispatch_invalid_and_error_links_are_skipped() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    mount_file(&mock_server, "/files/good.csv", b"x,y").await;

    let mut links = links_for(&mock_server, &["good.csv", "missing.csv"]);
    links.push(ResultLink::new("/relative/only.csv"));

    let report = dispatcher(temp_dir.path(), ConcurrencyLimit::Bounded(2))
        .dispatch(links, Arc::new(SilentObserver))
        .await
        .expect("dispatch should not error");

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.file_names(), vec!["good.csv"]);
}

#[tokio::test]
async fn test_dispatch_rerun_overwrites_existing_file() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dispatcher = dispatcher(temp_dir.path(), ConcurrencyLimit::Unbounded);
    let links = links_for(&mock_server, &["report.pdf"]);

    mount_file(&mock_server, "/files/report.pdf", b"first version, longer body").await;
    let first = dispatcher
        .dispatch(links.clone(), Arc::new(SilentObserver))
        .await
        .expect("first run");
    assert_eq!(first.succeeded(), 1);

    mock_server.reset().await;
    mount_file(&mock_server, "/files/report.pdf", b"second").await;
    let second = dispatcher
        .dispatch(links, Arc::new(SilentObserver))
        .await
        .expect("second run");

    assert_eq!(second.file_names(), vec!["report.pdf"]);
    let content = std::fs::read(temp_dir.path().join("report.pdf")).expect("file exists");
    assert_eq!(content, b"second");
}

#[tokio::test]
async fn test_dispatch_duplicate_links_both_attempted() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    mount_file(&mock_server, "/files/same.xls", b"same bytes").await;

    let links = links_for(&mock_server, &["same.xls", "same.xls"]);
    let report = dispatcher(temp_dir.path(), ConcurrencyLimit::Unbounded)
        .dispatch(links, Arc::new(SilentObserver))
        .await
        .expect("dispatch should not error");

    assert_eq!(report.attempted(), 2);
    assert_eq!(report.file_names(), vec!["same.xls", "same.xls"]);
    let content = std::fs::read(temp_dir.path().join("same.xls")).expect("file exists");
    assert_eq!(content, b"same bytes");
}

#[tokio::test]
async fn test_dispatch_bounded_to_one_completes_all() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let names: Vec<String> = (0..12).map(|i| format!("part-{i}.txt")).collect();
    for name in &names {
        mount_file(&mock_server, &format!("/files/{name}"), name.as_bytes()).await;
    }
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let report = dispatcher(temp_dir.path(), ConcurrencyLimit::Bounded(1))
        .dispatch(links_for(&mock_server, &name_refs), Arc::new(SilentObserver))
        .await
        .expect("dispatch should not error");

    assert_eq!(report.succeeded(), names.len());
}

#[tokio::test]
async fn test_dispatch_bounded_limits_requests_in_flight() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let delay = Duration::from_millis(300);
    Mock::given(method("GET"))
        .and(path_regex(r"^/files/slow-\d\.bin$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"slow".to_vec())
                .set_delay(delay),
        )
        .mount(&mock_server)
        .await;
    let names = ["slow-0.bin", "slow-1.bin", "slow-2.bin", "slow-3.bin"];

    let started = Instant::now();
    let report = dispatcher(temp_dir.path(), ConcurrencyLimit::Bounded(2))
        .dispatch(links_for(&mock_server, &names), Arc::new(SilentObserver))
        .await
        .expect("dispatch should not error");
    let elapsed = started.elapsed();

    assert_eq!(report.succeeded(), names.len());
    // Four delayed responses two at a time need at least two delay periods.
    assert!(
        elapsed >= delay * 2,
        "expected at least {:?} with two permits, took {elapsed:?}",
        delay * 2
    );
}

#[tokio::test]
async fn test_dispatch_truncated_body_keeps_received_prefix() {
    if should_skip_socket_bound_test() {
        return;
    }
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind listener");
    let addr = listener.local_addr().expect("listener address");
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept connection");
        let mut request = [0_u8; 1024];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\npartial-bytes")
            .await
            .expect("write response");
        socket.flush().await.expect("flush response");
    });
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let report = dispatcher(temp_dir.path(), ConcurrencyLimit::Unbounded)
        .dispatch(
            vec![ResultLink::new(format!("http://{addr}/cut.bin"))],
            Arc::new(SilentObserver),
        )
        .await
        .expect("dispatch should not error");
    server.await.expect("server task");

    assert_eq!(report.succeeded(), 0);
    assert_eq!(report.failed(), 1);
    let content = std::fs::read(temp_dir.path().join("cut.bin")).expect("partial file kept");
    assert_eq!(content, b"partial-bytes");
}

#[tokio::test]
async fn test_prepare_output_dir_then_dispatch_into_nested_folder() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let nested = temp_dir.path().join("runs").join("downloads");
    mount_file(&mock_server, "/files/n.pdf", b"nested").await;

    prepare_output_dir(&nested).await.expect("folder created");
    let report = dispatcher(&nested, ConcurrencyLimit::Unbounded)
        .dispatch(links_for(&mock_server, &["n.pdf"]), Arc::new(SilentObserver))
        .await
        .expect("dispatch should not error");

    assert_eq!(report.succeeded(), 1);
    assert!(nested.join("n.pdf").is_file());
}
