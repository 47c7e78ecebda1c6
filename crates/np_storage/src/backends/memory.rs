use async_trait::async_trait;
use chrono::Utc;
use np_core::{
    ArticleEnhancement, AudioClip, Category, ContentStore, FeedSnapshot, GalleryPost, NewGalleryPost,
    Result, StudioPost,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    enhancements: HashMap<String, ArticleEnhancement>,
    audio: HashMap<String, AudioClip>,
    feeds: HashMap<Category, FeedSnapshot>,
    studio_posts: Vec<StudioPost>,
    gallery_posts: Vec<GalleryPost>,
    next_post_id: i64,
}

impl MemoryStore {
    fn next_id(&mut self) -> i64 {
        self.next_post_id += 1;
        self.next_post_id
    }
}

/// Process-local persistent tier. Shares nothing across processes; useful
/// for single-node deployments and tests.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes an editorial post.
    pub async fn add_studio_post(&self, message: &str, media_url: Option<&str>) -> StudioPost {
        let mut store = self.store.write().await;
        let post = StudioPost {
            id: store.next_id(),
            message: message.to_string(),
            media_url: media_url.map(str::to_string),
            created_at: Utc::now(),
        };
        store.studio_posts.push(post.clone());
        post
    }
}

fn newest_first<T, F>(items: &[T], created_at: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> (chrono::DateTime<Utc>, i64),
{
    let mut items = items.to_vec();
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

#[async_trait]
impl ContentStore for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_enhancement(&self, article_id: &str) -> Result<Option<ArticleEnhancement>> {
        Ok(self.store.read().await.enhancements.get(article_id).cloned())
    }

    async fn put_enhancement(&self, article_id: &str, enhancement: &ArticleEnhancement) -> Result<()> {
        self.store
            .write()
            .await
            .enhancements
            .insert(article_id.to_string(), enhancement.clone());
        Ok(())
    }

    async fn get_audio(&self, key: &str) -> Result<Option<AudioClip>> {
        Ok(self.store.read().await.audio.get(key).cloned())
    }

    async fn put_audio(&self, clip: &AudioClip) -> Result<()> {
        self.store.write().await.audio.insert(clip.key.clone(), clip.clone());
        Ok(())
    }

    async fn get_feed(&self, category: Category) -> Result<Option<FeedSnapshot>> {
        Ok(self.store.read().await.feeds.get(&category).cloned())
    }

    async fn put_feed(&self, snapshot: &FeedSnapshot) -> Result<()> {
        self.store
            .write()
            .await
            .feeds
            .insert(snapshot.category, snapshot.clone());
        Ok(())
    }

    async fn recent_studio_posts(&self, limit: usize) -> Result<Vec<StudioPost>> {
        let store = self.store.read().await;
        let mut posts = newest_first(&store.studio_posts, |p| (p.created_at, p.id));
        posts.truncate(limit);
        Ok(posts)
    }

    async fn recent_gallery_posts(&self) -> Result<Vec<GalleryPost>> {
        let store = self.store.read().await;
        Ok(newest_first(&store.gallery_posts, |p| (p.created_at, p.id)))
    }

    async fn create_gallery_post(&self, post: &NewGalleryPost) -> Result<Option<GalleryPost>> {
        let mut store = self.store.write().await;
        let created = GalleryPost {
            id: store.next_id(),
            title: Some(post.title.clone()),
            description: Some(post.description.clone()),
            media_url: Some(post.media_url.clone()),
            created_at: Utc::now(),
        };
        store.gallery_posts.push(created.clone());
        Ok(Some(created))
    }
}
