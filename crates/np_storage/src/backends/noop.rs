use async_trait::async_trait;
use np_core::{
    ArticleEnhancement, AudioClip, Category, ContentStore, FeedSnapshot, GalleryPost, NewGalleryPost,
    Result, StudioPost,
};

/// Stands in for a persistent store that was never configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl ContentStore for NoopStore {
    fn name(&self) -> &str {
        "none"
    }

    async fn get_enhancement(&self, _article_id: &str) -> Result<Option<ArticleEnhancement>> {
        Ok(None)
    }

    async fn put_enhancement(&self, _article_id: &str, _enhancement: &ArticleEnhancement) -> Result<()> {
        Ok(())
    }

    async fn get_audio(&self, _key: &str) -> Result<Option<AudioClip>> {
        Ok(None)
    }

    async fn put_audio(&self, _clip: &AudioClip) -> Result<()> {
        Ok(())
    }

    async fn get_feed(&self, _category: Category) -> Result<Option<FeedSnapshot>> {
        Ok(None)
    }

    async fn put_feed(&self, _snapshot: &FeedSnapshot) -> Result<()> {
        Ok(())
    }

    async fn recent_studio_posts(&self, _limit: usize) -> Result<Vec<StudioPost>> {
        Ok(Vec::new())
    }

    async fn recent_gallery_posts(&self) -> Result<Vec<GalleryPost>> {
        Ok(Vec::new())
    }

    async fn create_gallery_post(&self, post: &NewGalleryPost) -> Result<Option<GalleryPost>> {
        tracing::debug!("No store configured, dropping gallery post {:?}", post.title);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_always_misses() {
        let store = NoopStore;
        let enhancement = ArticleEnhancement::degraded("t", "b");
        store.put_enhancement("a1", &enhancement).await.unwrap();
        assert!(store.get_enhancement("a1").await.unwrap().is_none());

        store.put_audio(&AudioClip::new("k", vec![1, 2])).await.unwrap();
        assert!(store.get_audio("k").await.unwrap().is_none());

        store.put_feed(&FeedSnapshot::new(Category::India, vec![])).await.unwrap();
        assert!(store.get_feed(Category::India).await.unwrap().is_none());

        let created = store
            .create_gallery_post(&NewGalleryPost {
                title: "t".into(),
                description: "d".into(),
                media_url: "m".into(),
            })
            .await
            .unwrap();
        assert!(created.is_none());
        assert!(store.recent_gallery_posts().await.unwrap().is_empty());
    }
}
