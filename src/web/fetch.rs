//! Upstream page retrieval.

use async_trait::async_trait;
use reqwest::{header, redirect, Client};
use thiserror::Error;
use url::Url;

const MAX_REDIRECTS: usize = 5;

/// A fetched upstream response. `body` is only read for HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub final_url: Url,
    pub content_type: String,
    pub body: Option<String>,
}

impl FetchedPage {
    pub fn is_html(&self) -> bool {
        is_html_content_type(&self.content_type)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("redirected to a disallowed target: {0}")]
    RedirectBlocked(String),
}

pub fn is_html_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Fetches over HTTP with a fixed user agent. Redirects are followed only
/// while they stay within the access policy.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if super::guard::is_allowed(attempt.url()) {
                attempt.follow()
            } else {
                attempt.stop()
            }
        });
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(policy)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let final_url = response.url().clone();
        if response.status().is_redirection() {
            return Err(FetchError::RedirectBlocked(
                final_url.host_str().unwrap_or_default().to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = if is_html_content_type(&content_type) {
            Some(
                response
                    .text()
                    .await
                    .map_err(|e| FetchError::Request(e.to_string()))?,
            )
        } else {
            None
        };

        tracing::debug!(url = %final_url, content_type = %content_type, "Fetched upstream page");
        Ok(FetchedPage {
            final_url,
            content_type,
            body,
        })
    }
}
