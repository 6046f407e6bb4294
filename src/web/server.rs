//! Axum server for the preview proxy.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::fetch::HttpFetcher;
use super::handlers::proxy::proxy_page;
use super::state::ProxyState;

pub const DEFAULT_USER_AGENT: &str = "BreakpointTester/1.0";

/// Server configuration options.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// User agent sent upstream.
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the Axum router with all routes.
pub fn build_router(state: ProxyState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/proxy", get(proxy_page));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the proxy server until shutdown.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let app = build_router(ProxyState::new(Arc::new(fetcher)));

    tracing::info!("Starting proxy server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
