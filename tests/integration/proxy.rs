//! The rewriting proxy behind the public router.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use breakpoint::web::{build_router, FetchError, FetchedPage, PageFetcher, ProxyState};
use http_body_util::BodyExt;
use parking_lot::Mutex;
use tower::ServiceExt;
use url::Url;

/// Serves one page and records what was requested. Simulates a redirect by
/// reporting a different final URL.
struct RecordingFetcher {
    final_url: Option<&'static str>,
    html: &'static str,
    requested: Mutex<Vec<String>>,
}

#[async_trait]
impl PageFetcher for RecordingFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.requested.lock().push(url.to_string());
        let final_url = match self.final_url {
            Some(raw) => Url::parse(raw).map_err(|e| FetchError::Request(e.to_string()))?,
            None => url.clone(),
        };
        Ok(FetchedPage {
            final_url,
            content_type: "text/html".to_string(),
            body: Some(self.html.to_string()),
        })
    }
}

async fn get_body(fetcher: Arc<RecordingFetcher>, uri: &str) -> (StatusCode, String) {
    let app = build_router(ProxyState::new(fetcher));
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_base_href_follows_the_final_url() {
    let fetcher = Arc::new(RecordingFetcher {
        final_url: Some("https://www.example.com/en/home.html"),
        html: "<html><head><title>Home</title></head><body></body></html>",
        requested: Mutex::new(Vec::new()),
    });
    let (status, body) = get_body(fetcher.clone(), "/api/proxy?u=https://example.com/").await;

    assert_eq!(status, StatusCode::OK);
    insta::assert_snapshot!(body, @r#"<html><head><base href="https://www.example.com/en/"><title>Home</title><script>window.__PROXIED__=true;</script></head><body></body></html>"#);
    assert_eq!(*fetcher.requested.lock(), vec!["https://example.com/".to_string()]);
}

#[tokio::test]
async fn test_blocked_targets_never_reach_the_fetcher() {
    let fetcher = Arc::new(RecordingFetcher {
        final_url: None,
        html: "",
        requested: Mutex::new(Vec::new()),
    });
    for target in [
        "http://localhost/",
        "http://10.0.0.8/admin",
        "http://[::1]:8080/",
        "file:///etc/hosts",
    ] {
        let uri = format!("/api/proxy?u={}", urlencode(target));
        let (status, body) = get_body(fetcher.clone(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{target}");
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "blocked", "{target}");
    }
    assert!(fetcher.requested.lock().is_empty());
}

fn urlencode(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}
