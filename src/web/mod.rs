//! Optional content-rewriting proxy that lets cross-origin pages render
//! inside the preview frames.

pub mod error;
pub mod fetch;
pub mod guard;
pub mod handlers;
pub mod rewrite;
pub mod server;
pub mod state;

pub use error::WebError;
pub use fetch::{FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use guard::{check_target, is_allowed};
pub use rewrite::{base_href, rewrite_document};
pub use server::{build_router, run_server, ServerConfig, DEFAULT_USER_AGENT};
pub use state::ProxyState;
