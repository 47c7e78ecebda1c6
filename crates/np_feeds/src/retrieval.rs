use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use np_core::{
    AppConfig, ArticleEnhancement, AudioClip, Category, CategoryRoute, ContentStore, GalleryPost, NewGalleryPost,
    NormalizedArticle, Result, StudioPost,
};
use np_inference::{create_enhancement_providers, create_speech_providers, EnhancementAdapter, SpeechAdapter};
use np_storage::{create_snapshot_store, create_storage, AudioContentCache, PendingWrites, TextContentCache};

use crate::catalog::FeedCatalog;
use crate::headlines::HeadlineSource;
use crate::orchestrator::FeedOrchestrator;
use crate::parser::RssParser;
use crate::transports::{default_transports, http_client};

pub const STUDIO_POST_LIMIT: usize = 20;
const STUDIO_TITLE_CHARS: usize = 60;
const STUDIO_DEFAULT_TITLE: &str = "Azad Studio Live Update";
const STUDIO_SOURCE: &str = "Azad Studio Live";
const GALLERY_DEFAULT_TITLE: &str = "Gallery Post";
const GALLERY_SOURCE: &str = "Azad Gallery";

/// Short messages are their own title; long ones keep the first line of
/// their opening characters.
pub fn studio_title(message: &str) -> String {
    if message.chars().count() > STUDIO_TITLE_CHARS {
        let head: String = message.chars().take(STUDIO_TITLE_CHARS).collect();
        format!("{}...", head.split('\n').next().unwrap_or_default())
    } else if message.is_empty() {
        STUDIO_DEFAULT_TITLE.to_string()
    } else {
        message.to_string()
    }
}

pub fn studio_article(post: StudioPost) -> NormalizedArticle {
    NormalizedArticle {
        id: format!("tg_{}", post.id),
        title: studio_title(&post.message),
        source: STUDIO_SOURCE.to_string(),
        published_at: Some(post.created_at),
        description: post.message,
        image_url: post.media_url,
        category: Category::Studio,
        url: "#".to_string(),
    }
}

pub fn gallery_article(post: GalleryPost) -> NormalizedArticle {
    NormalizedArticle {
        id: format!("gal_{}", post.id),
        title: post
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| GALLERY_DEFAULT_TITLE.to_string()),
        source: GALLERY_SOURCE.to_string(),
        published_at: Some(post.created_at),
        description: post.description.unwrap_or_default(),
        image_url: post.media_url,
        category: Category::Gallery,
        url: "#".to_string(),
    }
}

/// The operations a UI calls. Routes each category to the feed path or to a
/// direct store query and delegates enhancement and speech to their adapters.
pub struct RetrievalOrchestrator {
    feeds: FeedOrchestrator,
    store: Arc<dyn ContentStore>,
    enhancer: EnhancementAdapter,
    speech: SpeechAdapter,
    pending: PendingWrites,
}

impl RetrievalOrchestrator {
    pub fn new(
        feeds: FeedOrchestrator,
        store: Arc<dyn ContentStore>,
        enhancer: EnhancementAdapter,
        speech: SpeechAdapter,
        pending: PendingWrites,
    ) -> Self {
        Self {
            feeds,
            store,
            enhancer,
            speech,
            pending,
        }
    }

    /// Wires the live stack: configured store, default catalog and
    /// transports, and whichever providers have keys.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let store = create_storage(config.store, config.database_url.as_deref()).await?;
        let local = create_snapshot_store(config);
        let pending = PendingWrites::new();

        let feeds = FeedOrchestrator::new(
            FeedCatalog::default(),
            default_transports(http_client()?),
            Arc::new(RssParser::new()),
            store.clone(),
            local,
            pending.clone(),
        )
        .with_timeout(config.feed_timeout)
        .with_stale_after(config.stale_after);

        let text_cache = Arc::new(TextContentCache::for_enhancements(store.clone(), pending.clone()));
        let audio_cache = Arc::new(AudioContentCache::for_audio(store.clone(), pending.clone()));
        let enhancer = EnhancementAdapter::new(
            text_cache,
            create_enhancement_providers(&config.providers, config.provider_timeout),
        )
        .with_timeout(config.provider_timeout);
        let speech = SpeechAdapter::new(audio_cache, create_speech_providers(&config.providers, config.provider_timeout))
            .with_timeout(config.provider_timeout);

        tracing::info!(
            "🚀 Retrieval ready: store={}, enhancement={:?}",
            store.name(),
            enhancer.provider_names()
        );
        Ok(Self::new(feeds, store, enhancer, speech, pending))
    }

    pub fn pending(&self) -> &PendingWrites {
        &self.pending
    }

    pub async fn get_feed(&self, category: Category) -> Vec<NormalizedArticle> {
        match category.route() {
            CategoryRoute::Feed => self.feeds.fetch(category).await,
            CategoryRoute::Studio => self.studio_articles().await,
            CategoryRoute::Gallery => self.gallery_articles().await,
            CategoryRoute::Static => Vec::new(),
        }
    }

    async fn studio_articles(&self) -> Vec<NormalizedArticle> {
        match self.store.recent_studio_posts(STUDIO_POST_LIMIT).await {
            Ok(posts) => posts.into_iter().map(studio_article).collect(),
            Err(e) => {
                tracing::warn!("Studio posts unavailable from {}: {}", self.store.name(), e);
                Vec::new()
            }
        }
    }

    async fn gallery_articles(&self) -> Vec<NormalizedArticle> {
        match self.store.recent_gallery_posts().await {
            Ok(posts) => posts.into_iter().map(gallery_article).collect(),
            Err(e) => {
                tracing::warn!("Gallery posts unavailable from {}: {}", self.store.name(), e);
                Vec::new()
            }
        }
    }

    pub async fn get_enhancement(&self, article_id: &str, title: &str, text: &str) -> ArticleEnhancement {
        self.enhancer.enhance(article_id, title, text).await
    }

    pub async fn get_audio(&self, text: &str) -> Result<AudioClip> {
        self.speech.synthesize(text).await
    }

    /// `None` when no store is configured to keep the post.
    pub async fn create_gallery_post(&self, post: &NewGalleryPost) -> Result<Option<GalleryPost>> {
        self.store.create_gallery_post(post).await
    }

    /// Top titles of each category in the given order, exact duplicates
    /// removed. Categories are fetched concurrently.
    pub async fn breaking_headlines(&self, categories: &[Category], per_category: usize) -> Vec<String> {
        let feeds = join_all(categories.iter().map(|c| self.get_feed(*c))).await;

        let mut seen = HashSet::new();
        let mut headlines = Vec::new();
        for articles in feeds {
            for article in articles.into_iter().take(per_category) {
                if !article.title.is_empty() && seen.insert(article.title.clone()) {
                    headlines.push(article.title);
                }
            }
        }
        headlines
    }
}

#[async_trait]
impl HeadlineSource for RetrievalOrchestrator {
    async fn headlines(&self, categories: &[Category], per_category: usize) -> Vec<String> {
        self.breaking_headlines(categories, per_category).await
    }
}
