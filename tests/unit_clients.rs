// HTTP client tests against a local stub server.
//
// The stub answers one request per connection with whatever the handler
// returns for (request line, request index), and records every request
// line so tests can check paths, query strings and retry counts.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use keyword_pipeline::appstorespy::{AppstoreSpyClient, InstallsSource};
use keyword_pipeline::catalog;
use keyword_pipeline::error::ApiError;
use keyword_pipeline::keyapp::client::KeyappClient;
use keyword_pipeline::keywordtool::client::{KeywordToolClient, MetricsNetwork};
use keyword_pipeline::keywordtool::parse::flatten_results;
use keyword_pipeline::pipeline::fetch::{self, FetchOptions};
use keyword_pipeline::play::{GooglePlaySearch, SearchQuery, StoreSearch};
use keyword_pipeline::rate_limit::{RateLimiter, RetryPolicy};

struct Stub {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn stub<F>(handler: F) -> Stub
where
    F: Fn(&str, usize) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let line = read_request_line(&mut socket).await;
            let index = {
                let mut seen = seen.lock().unwrap();
                seen.push(line.clone());
                seen.len() - 1
            };
            let (status, body) = handler(&line, index);
            let response = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    Stub { base, requests }
}

/// Read headers and body (by Content-Length), return the request line.
async fn read_request_line(socket: &mut TcpStream) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];
    let mut header_end = None;
    let mut body_len = 0;

    loop {
        if let Some(end) = header_end {
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if header_end.is_none() {
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_string();
                body_len = head
                    .lines()
                    .filter_map(|l| l.split_once(':'))
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.trim().parse().ok())
                    .unwrap_or(0);
                header_end = Some(end);
            }
        }
    }

    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

// ============================================================
// KeywordTool
// ============================================================

fn keywordtool(stub: &Stub) -> KeywordToolClient {
    KeywordToolClient::new("test-key", Duration::from_secs(5))
        .unwrap()
        .with_endpoint(&format!("{}/v2/search/volume/google", stub.base))
}

#[tokio::test]
async fn keywordtool_retries_gateway_errors() {
    let stub = stub(|_, n| {
        if n == 0 {
            (503, "busy".to_string())
        } else {
            (200, r#"{"results": {"betano": {"volume": "1200"}}}"#.to_string())
        }
    })
    .await;

    let country = catalog::country("br").unwrap();
    let data = keywordtool(&stub)
        .fetch_volumes(
            &RateLimiter::pacing(Duration::ZERO),
            RetryPolicy::new(3, 0.0),
            country,
            &["betano".to_string()],
            MetricsNetwork::GoogleSearch,
        )
        .await
        .unwrap();

    let rows = flatten_results(&data, "br", "pt");
    assert_eq!(rows[0].search_volume, Some(1200));

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("POST /v2/search/volume/google"));
}

#[tokio::test]
async fn keywordtool_client_errors_fail_at_once() {
    let stub = stub(|_, _| (401, r#"{"error": "bad key"}"#.to_string())).await;

    let country = catalog::country("pl").unwrap();
    let result = keywordtool(&stub)
        .fetch_volumes(
            &RateLimiter::pacing(Duration::ZERO),
            RetryPolicy::new(5, 0.0),
            country,
            &["sts".to_string()],
            MetricsNetwork::GoogleSearchNetwork,
        )
        .await;

    match result {
        Err(ApiError::Status { status, body, .. }) => {
            assert_eq!(status, 401);
            assert!(body.contains("bad key"));
        }
        other => panic!("expected a 401 status error, got {other:?}"),
    }
    assert_eq!(stub.requests().len(), 1);
}

#[tokio::test]
async fn bad_batch_size_fails_before_any_request() {
    let stub = stub(|_, _| (200, "{}".to_string())).await;
    let countries = vec![catalog::country("br").unwrap()];
    let opts = FetchOptions {
        batch_size: 0,
        out_dir: std::env::temp_dir(),
        ..FetchOptions::default()
    };

    let err = fetch::run(&keywordtool(&stub), &countries, &opts)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("--batch-size"));
    assert!(stub.requests().is_empty());
}

// ============================================================
// Google Play search
// ============================================================

const RESULTS_PAGE: &str = r#"<a href="/store/apps/details?id=com.betano.app">Betano</a>
<a href="/store/apps/details?id=com.rival.app">Rival</a>"#;

fn query() -> SearchQuery {
    SearchQuery {
        keyword: "betano".to_string(),
        language: "pt".to_string(),
        country: "br".to_string(),
        top_n: 10,
    }
}

#[tokio::test]
async fn play_search_sends_locale() {
    let stub = stub(|_, _| (200, RESULTS_PAGE.to_string())).await;
    let search = GooglePlaySearch::new(Duration::ZERO)
        .unwrap()
        .with_search_url(&format!("{}/store/search", stub.base));

    let found = search.search(&query()).await.unwrap();
    let ids: Vec<&str> = found.iter().map(|c| c.app_id.as_str()).collect();
    assert_eq!(ids, vec!["com.betano.app", "com.rival.app"]);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains("q=betano"));
    assert!(requests[0].contains("hl=pt"));
    assert!(requests[0].contains("gl=BR"));
}

#[tokio::test]
async fn play_search_falls_back_to_no_locale() {
    let stub = stub(|_, n| {
        if n == 0 {
            (500, String::new())
        } else {
            (200, RESULTS_PAGE.to_string())
        }
    })
    .await;
    let search = GooglePlaySearch::new(Duration::ZERO)
        .unwrap()
        .with_search_url(&format!("{}/store/search", stub.base));

    let found = search.search(&query()).await.unwrap();
    assert_eq!(found.len(), 2);

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].contains("hl=pt"));
    assert!(!requests[1].contains("hl="));
}

// ============================================================
// AppstoreSpy
// ============================================================

#[tokio::test]
async fn appstorespy_uses_trends_when_daily_is_missing() {
    let stub = stub(|line, _| {
        if line.contains("/apps/summary") {
            (404, String::new())
        } else if line.contains("/apps/app") {
            (200, r#"{"is_published": true}"#.to_string())
        } else if line.contains("/apps/trends") {
            (200, r#"{"daily_installs": [10, {"value": 20}, "35"]}"#.to_string())
        } else {
            (500, String::new())
        }
    })
    .await;

    let client = AppstoreSpyClient::new("aspy-key", Duration::ZERO)
        .unwrap()
        .with_base_url(&format!("{}/v1/", stub.base));
    let meta = client.app_meta("com.betano.app").await.unwrap();

    assert_eq!(meta.daily_installs, Some(35.0));
    assert_eq!(meta.banned, Some(false));

    let requests = stub.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].starts_with("GET /v1/apps/summary?"));
    assert!(requests.iter().all(|r| r.contains("store=google")));
    assert!(requests.iter().all(|r| r.contains("app_id=com.betano.app")));
}

#[tokio::test]
async fn appstorespy_skips_trends_when_summary_has_daily() {
    let stub = stub(|line, _| {
        if line.contains("/apps/summary") {
            (200, r#"{"installs_daily": 480, "status": "removed"}"#.to_string())
        } else {
            (200, "{}".to_string())
        }
    })
    .await;

    let client = AppstoreSpyClient::new("aspy-key", Duration::ZERO)
        .unwrap()
        .with_base_url(&stub.base);
    let meta = client.app_meta("com.gone.app").await.unwrap();

    assert_eq!(meta.daily_installs, Some(480.0));
    assert_eq!(meta.banned, Some(true));
    assert!(stub.requests().iter().all(|r| !r.contains("/apps/trends")));
}

// ============================================================
// Keyapp
// ============================================================

#[tokio::test]
async fn keyapp_titles_from_apps_list() {
    let stub = stub(|_, _| {
        (
            200,
            r#"{"apps": [{"title": "Betano Pro"}, {"name": "KTO Sports"}]}"#.to_string(),
        )
    })
    .await;

    let client = KeyappClient::new(&format!("{}/api/v2/", stub.base), "token").unwrap();
    assert_eq!(client.app_titles().await, vec!["Betano Pro", "KTO Sports"]);
    assert!(stub.requests()[0].starts_with("GET /api/v2/apps "));
}

#[tokio::test]
async fn keyapp_failure_is_an_empty_list() {
    let stub = stub(|_, _| (500, "down".to_string())).await;
    let client = KeyappClient::new(&stub.base, "token").unwrap();
    assert!(client.app_titles().await.is_empty());
}
