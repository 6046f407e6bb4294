//! Shared state for proxy handlers.

use std::sync::Arc;

use super::fetch::PageFetcher;

#[derive(Clone)]
pub struct ProxyState {
    fetcher: Arc<dyn PageFetcher>,
}

impl ProxyState {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &dyn PageFetcher {
        self.fetcher.as_ref()
    }
}
