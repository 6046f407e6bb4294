//! Error types for the preview proxy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error type for proxy requests.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Missing or malformed request parameter.
    #[error("Bad request: {0}")]
    BadRequest(&'static str),

    /// Target refused by the access policy.
    #[error("Blocked target: {0}")]
    Blocked(String),

    /// Upstream could not be fetched.
    #[error("Upstream fetch failed: {0}")]
    Upstream(String),

    /// Upstream answered with something other than HTML.
    #[error("Unsupported content type: {content_type}")]
    UnsupportedContent { content_type: String },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) | WebError::Blocked(_) => StatusCode::BAD_REQUEST,
            WebError::Upstream(_) => StatusCode::BAD_GATEWAY,
            WebError::UnsupportedContent { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            WebError::BadRequest(msg) => ErrorResponse {
                error: msg.to_string(),
                details: None,
                content_type: None,
            },
            WebError::Blocked(host) => ErrorResponse {
                error: "blocked".to_string(),
                details: Some(host),
                content_type: None,
            },
            WebError::Upstream(msg) => {
                tracing::warn!("Upstream fetch failed: {}", msg);
                ErrorResponse {
                    error: "fetch failed".to_string(),
                    details: Some(msg),
                    content_type: None,
                }
            }
            WebError::UnsupportedContent { content_type } => ErrorResponse {
                error: "not html".to_string(),
                details: None,
                content_type: Some(content_type),
            },
            WebError::Internal(msg) => {
                tracing::error!("Internal server error: {}", msg);
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    details: None,
                    content_type: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
