use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use np_core::config::{DEFAULT_FEED_TIMEOUT_SECS, DEFAULT_STALE_AFTER_SECS};
use np_core::{Category, ContentStore, FeedParser, FeedSnapshot, FeedTransport, NormalizedArticle, SnapshotStore};
use np_storage::PendingWrites;

use crate::catalog::FeedCatalog;
use crate::logging::Logger;
use crate::normalize::{dedup_by_title, normalize_item, source_label};

/// Produces the freshest available article list for a feed category:
/// persistent snapshot, local snapshot, live fetch, then stale snapshots.
pub struct FeedOrchestrator {
    catalog: FeedCatalog,
    transports: Vec<Arc<dyn FeedTransport>>,
    parser: Arc<dyn FeedParser>,
    store: Arc<dyn ContentStore>,
    local: Arc<dyn SnapshotStore>,
    pending: PendingWrites,
    timeout: Duration,
    stale_after: chrono::Duration,
}

impl FeedOrchestrator {
    pub fn new(
        catalog: FeedCatalog,
        transports: Vec<Arc<dyn FeedTransport>>,
        parser: Arc<dyn FeedParser>,
        store: Arc<dyn ContentStore>,
        local: Arc<dyn SnapshotStore>,
        pending: PendingWrites,
    ) -> Self {
        Self {
            catalog,
            transports,
            parser,
            store,
            local,
            pending,
            timeout: Duration::from_secs(DEFAULT_FEED_TIMEOUT_SECS),
            stale_after: chrono::Duration::seconds(DEFAULT_STALE_AFTER_SECS as i64),
        }
    }

    /// Per-transport attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        if let Ok(stale_after) = chrono::Duration::from_std(stale_after) {
            self.stale_after = stale_after;
        }
        self
    }

    async fn load_persistent(&self, category: Category, logger: &Logger) -> Option<FeedSnapshot> {
        match self.store.get_feed(category).await {
            Ok(snapshot) => snapshot.filter(|s| !s.is_empty()),
            Err(e) => {
                logger.warn(&format!("{} feed cache read failed: {}", self.store.name(), e));
                None
            }
        }
    }

    async fn load_local(&self, category: Category, logger: &Logger) -> Option<FeedSnapshot> {
        match self.local.load(category).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                logger.warn(&format!("Local snapshot unreadable: {}", e));
                None
            }
        }
    }

    /// Never fails. An empty list means nothing live and nothing cached.
    pub async fn fetch(&self, category: Category) -> Vec<NormalizedArticle> {
        let logger = Logger::new().with_prefix(category.to_string());
        let now = Utc::now();

        let persistent = self.load_persistent(category, &logger).await;
        if let Some(snapshot) = &persistent {
            if snapshot.is_fresh_at(now, self.stale_after) {
                logger.debug(&format!("Fresh {} snapshot, {} articles", self.store.name(), snapshot.articles.len()));
                return snapshot.articles.clone();
            }
        }

        let local = self.load_local(category, &logger).await;
        if let Some(snapshot) = &local {
            if snapshot.is_fresh_at(now, self.stale_after) {
                logger.debug(&format!("Fresh local snapshot, {} articles", snapshot.articles.len()));
                return snapshot.articles.clone();
            }
        }

        let fetched = self.fetch_live(category, &logger).await;
        if !fetched.is_empty() {
            logger.info(&format!("📰 Fetched {} articles", fetched.len()));
            self.save_snapshot(FeedSnapshot::new(category, fetched.clone()), &logger)
                .await;
            return fetched;
        }

        if let Some(snapshot) = persistent {
            logger.warn(&format!("Live fetch empty, serving stale {} snapshot", self.store.name()));
            return snapshot.articles;
        }
        if let Some(snapshot) = local.filter(|s| !s.is_empty()) {
            logger.warn("Live fetch empty, serving stale local snapshot");
            return snapshot.articles;
        }

        logger.warn("Live fetch empty and nothing cached");
        Vec::new()
    }

    async fn save_snapshot(&self, snapshot: FeedSnapshot, logger: &Logger) {
        if let Err(e) = self.local.save(&snapshot).await {
            logger.warn(&format!("Local snapshot write failed: {}", e));
        }

        let store = self.store.clone();
        let logger = logger.clone();
        self.pending.spawn(async move {
            if let Err(e) = store.put_feed(&snapshot).await {
                logger.warn(&format!("{} feed cache write failed: {}", store.name(), e));
            }
        });
    }

    /// All sources concurrently, merged in catalog order and deduplicated.
    async fn fetch_live(&self, category: Category, logger: &Logger) -> Vec<NormalizedArticle> {
        let sources = self.catalog.sources(category);
        if sources.is_empty() {
            return Vec::new();
        }

        let results = join_all(sources.iter().map(|url| self.fetch_source(category, url, logger))).await;
        dedup_by_title(results.into_iter().flatten().collect())
    }

    /// Transports strictly in order; the first non-empty payload that parses
    /// to at least one item wins.
    async fn fetch_source(&self, category: Category, feed_url: &str, logger: &Logger) -> Vec<NormalizedArticle> {
        let source = source_label(feed_url);
        let logger = logger.clone().with_prefix(source.clone());

        for transport in &self.transports {
            let payload = match tokio::time::timeout(self.timeout, transport.fetch(feed_url)).await {
                Err(_) => {
                    logger.debug(&format!("{} timed out after {:?}", transport.name(), self.timeout));
                    continue;
                }
                Ok(Err(e)) => {
                    logger.debug(&format!("{} failed: {}", transport.name(), e));
                    continue;
                }
                Ok(Ok(payload)) if payload.trim().is_empty() => {
                    logger.debug(&format!("{} returned an empty payload", transport.name()));
                    continue;
                }
                Ok(Ok(payload)) => payload,
            };

            match self.parser.parse(&payload) {
                Ok(items) if !items.is_empty() => {
                    logger.debug(&format!("{} items via {}", items.len(), transport.name()));
                    return items
                        .into_iter()
                        .map(|item| normalize_item(item, &source, category))
                        .collect();
                }
                Ok(_) => logger.debug(&format!("{} payload had no items", transport.name())),
                Err(e) => logger.debug(&format!("{} payload did not parse: {}", transport.name(), e)),
            }
        }

        logger.warn(&format!("All {} transports failed for {}", self.transports.len(), feed_url));
        Vec::new()
    }
}
