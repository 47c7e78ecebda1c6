use async_trait::async_trait;

use crate::types::{
    ArticleEnhancement, AudioClip, Category, FeedSnapshot, GalleryPost, NewGalleryPost, StudioPost,
};
use crate::Result;

/// Long-lived store shared across sessions. A backend that is not configured
/// misses on every read and ignores every write.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    async fn get_enhancement(&self, article_id: &str) -> Result<Option<ArticleEnhancement>>;

    async fn put_enhancement(&self, article_id: &str, enhancement: &ArticleEnhancement) -> Result<()>;

    async fn get_audio(&self, key: &str) -> Result<Option<AudioClip>>;

    async fn put_audio(&self, clip: &AudioClip) -> Result<()>;

    async fn get_feed(&self, category: Category) -> Result<Option<FeedSnapshot>>;

    /// Replaces the snapshot for its category.
    async fn put_feed(&self, snapshot: &FeedSnapshot) -> Result<()>;

    /// Editorial posts, newest first.
    async fn recent_studio_posts(&self, limit: usize) -> Result<Vec<StudioPost>>;

    /// User-submitted posts, newest first.
    async fn recent_gallery_posts(&self) -> Result<Vec<GalleryPost>>;

    async fn create_gallery_post(&self, post: &NewGalleryPost) -> Result<Option<GalleryPost>>;
}

/// Session-local feed snapshots, consulted after the persistent store.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self, category: Category) -> Result<Option<FeedSnapshot>>;

    async fn save(&self, snapshot: &FeedSnapshot) -> Result<()>;
}
