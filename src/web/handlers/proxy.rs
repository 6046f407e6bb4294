//! `GET /api/proxy?u=<url>`: fetch a public page and rewrite it for framing.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::web::error::WebError;
use crate::web::fetch::FetchError;
use crate::web::guard::check_target;
use crate::web::rewrite::rewrite_document;
use crate::web::state::ProxyState;

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub u: Option<String>,
}

pub async fn proxy_page(
    State(state): State<ProxyState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, WebError> {
    let target = check_target(query.u.as_deref())?;

    let page = state.fetcher().fetch(&target).await.map_err(|e| match e {
        FetchError::RedirectBlocked(host) => WebError::Blocked(host),
        FetchError::Request(msg) => WebError::Upstream(msg),
    })?;

    if !page.is_html() {
        return Err(WebError::UnsupportedContent {
            content_type: page.content_type,
        });
    }
    let html = page.body.unwrap_or_default();
    let rewritten = rewrite_document(&html, &page.final_url);
    tracing::info!(url = %page.final_url, bytes = rewritten.len(), "Proxied page");

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        rewritten,
    )
        .into_response())
}
