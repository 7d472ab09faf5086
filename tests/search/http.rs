//! `HttpApi` against a throwaway HTTP server on localhost.

use sitesearch::{Config, HttpApi, LicenseMode, SearchApi, SearchError};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// Canned `(status, body)` per path, plus a log of request targets.
struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    fn start(routes: &[(&str, u16, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: HashMap<String, (u16, String)> = routes
            .iter()
            .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                loop {
                    let mut header = String::new();
                    if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                        break;
                    }
                }

                let target = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();
                let path = target.split('?').next().unwrap_or("/").to_string();
                log.lock().unwrap().push(target);

                let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or((404, "not found".to_string()));
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Self { base_url, requests }
    }

    fn api(&self) -> HttpApi {
        let mut config = Config::new("k1");
        config.api_base_url = self.base_url.clone();
        HttpApi::new(config)
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn test_license_mode_sends_key() {
    let server = StubServer::start(&[("/v1/config", 200, r#"{"mode":"client"}"#)]);
    let mode = server.api().license_mode().await.unwrap();
    assert_eq!(mode, LicenseMode::Client);
    assert_eq!(server.requests(), vec!["/v1/config?key=k1"]);
}

#[tokio::test]
async fn test_search_parses_hits() {
    let server = StubServer::start(&[(
        "/v1/search",
        200,
        r#"[{"title":"<mark>Rust</mark>","excerpt":"about rust","uri":"/rust","category":"docs"}]"#,
    )]);
    let hits = server.api().search("rust").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].uri, "/rust");
    assert_eq!(server.requests(), vec!["/v1/search?key=k1&query=rust"]);
}

#[tokio::test]
async fn test_bundle_url_follows_key() {
    let server = StubServer::start(&[("/v1/index/k1.json", 200, r#"{"documents":[]}"#)]);
    let raw = server.api().index_bundle().await.unwrap();
    assert_eq!(raw, r#"{"documents":[]}"#);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = StubServer::start(&[("/v1/search", 500, "oops")]);
    let err = server.api().search("rust").await.unwrap_err();
    assert!(matches!(err, SearchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let server = StubServer::start(&[("/v1/recommendations", 200, "<html></html>")]);
    let err = server.api().recommendations().await.unwrap_err();
    assert!(matches!(err, SearchError::Malformed { .. }));
}

#[tokio::test]
async fn test_metrics_carries_count() {
    let server = StubServer::start(&[("/v1/metrics", 200, "")]);
    server.api().send_metrics("rust", 4).await.unwrap();
    assert_eq!(
        server.requests(),
        vec!["/v1/metrics?key=k1&query=rust&results_count=4"]
    );
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = Config::new("k1");
    config.api_base_url = format!("http://{}", addr);
    let err = HttpApi::new(config).license_mode().await.unwrap_err();
    assert!(matches!(err, SearchError::Transport { .. }));
}
