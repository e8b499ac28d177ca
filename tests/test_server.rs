//! End-to-end tests over loopback sockets for both concurrency modes.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::time::{Duration, Instant};

use spire::config::{ConcurrencyMode, Config};
use spire::server::listener;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const SLOW_SCRIPT: &[u8] = b"#!/bin/sh\n\
sleep 1\n\
printf 'HTTP/1.0 200 OK\\r\\nContent-Type: text/plain\\r\\n\\r\\nslow done\\n'\n";

async fn start(mode: ConcurrencyMode) -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("www");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("fast.txt"), "fast\n").unwrap();
    let slow = root.join("slow.cgi");
    fs::write(&slow, SLOW_SCRIPT).unwrap();
    fs::set_permissions(&slow, fs::Permissions::from_mode(0o755)).unwrap();

    let mut cfg = Config::default();
    cfg.server.mode = mode;
    cfg.documents.root = root;
    cfg.documents.mime_types = dir.path().join("no-mime.types");
    let cfg = cfg.canonicalize_root().unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(listener::serve(listener, cfg));

    (dir, addr)
}

async fn fetch(addr: &str, uri: &str) -> (String, Instant) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {uri} HTTP/1.0\r\nHost: {addr}\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    (String::from_utf8(out).unwrap(), Instant::now())
}

fn body_of(response: &str) -> &str {
    response.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_serial_serves_static_file() {
    let (_dir, addr) = start(ConcurrencyMode::Serial).await;

    let (response, _) = fetch(&addr, "/fast.txt").await;

    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
    // No mime table on disk: everything falls back to the default.
    assert!(response.contains("Content-Type: text/plain\r\n"));
    assert_eq!(body_of(&response), "fast\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_serial_keeps_serving_after_bad_request() {
    let (_dir, addr) = start(ConcurrencyMode::Serial).await;

    let mut stream = TcpStream::connect(&addr).await.unwrap();
    stream.write_all(b"garbage\r\n\r\n").await.unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    assert!(out.starts_with(b"HTTP/1.0 400 Bad Request\r\n"));

    let (response, _) = fetch(&addr, "/fast.txt").await;
    assert_eq!(body_of(&response), "fast\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_serial_second_request_waits_for_first() {
    let (_dir, addr) = start(ConcurrencyMode::Serial).await;

    let slow = tokio::spawn({
        let addr = addr.clone();
        async move { fetch(&addr, "/slow.cgi").await }
    });
    tokio::time::sleep(Duration::from_millis(200)).await;
    let (fast_response, fast_done) = fetch(&addr, "/fast.txt").await;
    let (slow_response, slow_done) = slow.await.unwrap();

    assert_eq!(body_of(&slow_response), "slow done\n");
    assert_eq!(body_of(&fast_response), "fast\n");
    assert!(fast_done >= slow_done);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_forking_fast_request_not_blocked_by_slow_one() {
    let (_dir, addr) = start(ConcurrencyMode::Forking).await;

    let slow = tokio::spawn({
        let addr = addr.clone();
        async move { fetch(&addr, "/slow.cgi").await }
    });
    tokio::time::sleep(Duration::from_millis(200)).await;
    let (fast_response, fast_done) = fetch(&addr, "/fast.txt").await;
    let (slow_response, slow_done) = slow.await.unwrap();

    assert_eq!(body_of(&fast_response), "fast\n");
    assert_eq!(body_of(&slow_response), "slow done\n");
    assert!(fast_done < slow_done);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_forking_slow_scripts_run_concurrently() {
    let (_dir, addr) = start(ConcurrencyMode::Forking).await;

    let started = Instant::now();
    let first = tokio::spawn({
        let addr = addr.clone();
        async move { fetch(&addr, "/slow.cgi").await }
    });
    let second = tokio::spawn({
        let addr = addr.clone();
        async move { fetch(&addr, "/slow.cgi").await }
    });
    let (first, _) = first.await.unwrap();
    let (second, _) = second.await.unwrap();

    assert_eq!(body_of(&first), "slow done\n");
    assert_eq!(body_of(&second), "slow done\n");
    // Each script sleeps one second; run back to back they would need two.
    assert!(started.elapsed() < Duration::from_millis(1900));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_forking_reports_sandbox_violation_as_not_found() {
    let (dir, addr) = start(ConcurrencyMode::Forking).await;
    fs::write(dir.path().join("outside.txt"), "hidden").unwrap();

    let (response, _) = fetch(&addr, "/../outside.txt").await;

    assert!(response.starts_with("HTTP/1.0 404 Not Found\r\n"));
    assert!(!response.contains("hidden"));
}
