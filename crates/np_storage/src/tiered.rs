use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use np_core::{ArticleEnhancement, AudioClip, ContentStore, Result};
use tokio::sync::RwLock;

use crate::PendingWrites;

/// The persistent half of a [`TieredCache`].
#[async_trait]
pub trait PersistentTier<V>: Send + Sync {
    fn name(&self) -> &str;

    async fn load(&self, key: &str) -> Result<Option<V>>;

    async fn save(&self, key: &str, value: &V) -> Result<()>;
}

pub struct EnhancementTier(pub Arc<dyn ContentStore>);

#[async_trait]
impl PersistentTier<ArticleEnhancement> for EnhancementTier {
    fn name(&self) -> &str {
        self.0.name()
    }

    async fn load(&self, key: &str) -> Result<Option<ArticleEnhancement>> {
        self.0.get_enhancement(key).await
    }

    async fn save(&self, key: &str, value: &ArticleEnhancement) -> Result<()> {
        self.0.put_enhancement(key, value).await
    }
}

pub struct AudioTier(pub Arc<dyn ContentStore>);

#[async_trait]
impl PersistentTier<AudioClip> for AudioTier {
    fn name(&self) -> &str {
        self.0.name()
    }

    async fn load(&self, key: &str) -> Result<Option<AudioClip>> {
        self.0.get_audio(key).await
    }

    async fn save(&self, _key: &str, value: &AudioClip) -> Result<()> {
        self.0.put_audio(value).await
    }
}

/// Immutable values behind two tiers: an in-process map checked first and a
/// persistent store checked second. Persistent hits are copied into memory.
/// Nothing is ever evicted.
pub struct TieredCache<V> {
    label: &'static str,
    memory: RwLock<HashMap<String, V>>,
    persistent: Arc<dyn PersistentTier<V>>,
    pending: PendingWrites,
}

/// AI-enhanced article text, keyed by article id.
pub type TextContentCache = TieredCache<ArticleEnhancement>;

/// Synthesized speech, keyed by audio cache key.
pub type AudioContentCache = TieredCache<AudioClip>;

impl TieredCache<ArticleEnhancement> {
    pub fn for_enhancements(store: Arc<dyn ContentStore>, pending: PendingWrites) -> Self {
        Self::new("text", Arc::new(EnhancementTier(store)), pending)
    }
}

impl TieredCache<AudioClip> {
    pub fn for_audio(store: Arc<dyn ContentStore>, pending: PendingWrites) -> Self {
        Self::new("audio", Arc::new(AudioTier(store)), pending)
    }
}

impl<V> TieredCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(label: &'static str, persistent: Arc<dyn PersistentTier<V>>, pending: PendingWrites) -> Self {
        Self {
            label,
            memory: RwLock::new(HashMap::new()),
            persistent,
            pending,
        }
    }

    /// Misses at both tiers, and persistent read failures, come back as `None`.
    pub async fn get(&self, key: &str) -> Option<V> {
        if let Some(value) = self.memory.read().await.get(key) {
            tracing::debug!("{} cache: memory hit for {}", self.label, key);
            return Some(value.clone());
        }

        match self.persistent.load(key).await {
            Ok(Some(value)) => {
                tracing::debug!("{} cache: {} hit for {}", self.label, self.persistent.name(), key);
                self.memory.write().await.insert(key.to_string(), value.clone());
                Some(value)
            }
            Ok(None) => {
                tracing::debug!("{} cache: miss for {}", self.label, key);
                None
            }
            Err(e) => {
                tracing::warn!("{} cache: {} read failed for {}: {}", self.label, self.persistent.name(), key, e);
                None
            }
        }
    }

    /// Writes memory now and the persistent tier in the background.
    pub async fn put(&self, key: &str, value: V) {
        self.memory.write().await.insert(key.to_string(), value.clone());

        let persistent = self.persistent.clone();
        let label = self.label;
        let key = key.to_string();
        self.pending.spawn(async move {
            if let Err(e) = persistent.save(&key, &value).await {
                tracing::warn!("{} cache: {} write failed for {}: {}", label, persistent.name(), key, e);
            }
        });
    }

    pub async fn contains_in_memory(&self, key: &str) -> bool {
        self.memory.read().await.contains_key(key)
    }

    pub fn pending(&self) -> &PendingWrites {
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{MemoryStorage, NoopStore};
    use np_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingTier {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl PersistentTier<String> for FailingTier {
        fn name(&self) -> &str {
            "failing"
        }

        async fn load(&self, _key: &str) -> Result<Option<String>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Err(Error::Storage("connection refused".to_string()))
        }

        async fn save(&self, _key: &str, _value: &String) -> Result<()> {
            Err(Error::Storage("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_persistent_hit_hydrates_memory() {
        let store = Arc::new(MemoryStorage::new());
        let enhancement = ArticleEnhancement::degraded("Title", "Body");
        store.put_enhancement("rss_1", &enhancement).await.unwrap();

        let cache = TextContentCache::for_enhancements(store.clone(), PendingWrites::new());
        assert!(!cache.contains_in_memory("rss_1").await);
        assert_eq!(cache.get("rss_1").await, Some(enhancement));
        assert!(cache.contains_in_memory("rss_1").await);
    }

    #[tokio::test]
    async fn test_put_writes_through_to_store() {
        let store = Arc::new(MemoryStorage::new());
        let pending = PendingWrites::new();
        let cache = AudioContentCache::for_audio(store.clone(), pending.clone());

        cache.put("tts_a_5", AudioClip::new("tts_a_5", vec![9, 9])).await;
        pending.flush().await;

        assert!(store.get_audio("tts_a_5").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_absent_store_is_always_miss() {
        let cache = TextContentCache::for_enhancements(Arc::new(NoopStore), PendingWrites::new());
        assert!(cache.get("anything").await.is_none());

        cache.put("anything", ArticleEnhancement::degraded("t", "b")).await;
        cache.pending().flush().await;
        assert!(cache.get("anything").await.is_some());
    }

    #[tokio::test]
    async fn test_persistent_failures_are_swallowed() {
        let tier = Arc::new(FailingTier {
            loads: AtomicUsize::new(0),
        });
        let cache: TieredCache<String> = TieredCache::new("test", tier.clone(), PendingWrites::new());

        assert!(cache.get("k").await.is_none());
        cache.put("k", "v".to_string()).await;
        cache.pending().flush().await;

        assert_eq!(cache.get("k").await.as_deref(), Some("v"));
        assert_eq!(tier.loads.load(Ordering::SeqCst), 1);
    }
}
