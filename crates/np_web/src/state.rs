use std::sync::Arc;

use np_core::config::DEFAULT_HEADLINES_PER_CATEGORY;
use np_feeds::{HeadlineTicker, RetrievalOrchestrator};

pub struct AppState {
    pub retrieval: Arc<RetrievalOrchestrator>,
    /// When absent, headlines are computed per request.
    pub ticker: Option<Arc<HeadlineTicker>>,
    pub headlines_per_category: usize,
}

impl AppState {
    pub fn new(retrieval: Arc<RetrievalOrchestrator>) -> Self {
        Self {
            retrieval,
            ticker: None,
            headlines_per_category: DEFAULT_HEADLINES_PER_CATEGORY,
        }
    }

    pub fn with_ticker(mut self, ticker: Arc<HeadlineTicker>) -> Self {
        self.ticker = Some(ticker);
        self
    }

    pub fn with_headlines_per_category(mut self, per_category: usize) -> Self {
        self.headlines_per_category = per_category;
        self
    }
}
