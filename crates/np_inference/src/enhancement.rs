use std::sync::Arc;
use std::time::Duration;

use np_core::config::DEFAULT_PROVIDER_TIMEOUT_SECS;
use np_core::{ArticleEnhancement, EnhancementProvider, Error, Result};
use np_storage::TextContentCache;
use serde_json::Value;

use crate::prompt::ENHANCEMENT_SYSTEM_PROMPT;

/// Turns a provider's JSON answer into an [`ArticleEnhancement`]. A missing
/// field, a non-string field or an empty article body all count as failure.
pub fn validate_enhancement(value: Value) -> Result<ArticleEnhancement> {
    let enhancement: ArticleEnhancement = serde_json::from_value(value)
        .map_err(|e| Error::Parse(format!("enhancement response is incomplete: {}", e)))?;

    if enhancement.full_article.trim().is_empty() {
        return Err(Error::Parse("enhancement response has an empty fullArticle".to_string()));
    }
    Ok(enhancement)
}

/// Expands, summarizes and translates articles, trying providers strictly in
/// order and never failing outwardly.
pub struct EnhancementAdapter {
    cache: Arc<TextContentCache>,
    providers: Vec<Arc<dyn EnhancementProvider>>,
    timeout: Duration,
}

impl EnhancementAdapter {
    pub fn new(cache: Arc<TextContentCache>, providers: Vec<Arc<dyn EnhancementProvider>>) -> Self {
        Self {
            cache,
            providers,
            timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        }
    }

    /// A provider that has not answered within `timeout` counts as failed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &Arc<TextContentCache> {
        &self.cache
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn enhance(&self, article_id: &str, title: &str, source_text: &str) -> ArticleEnhancement {
        if let Some(cached) = self.cache.get(article_id).await {
            return cached;
        }

        for provider in &self.providers {
            let answer = tokio::time::timeout(
                self.timeout,
                provider.request(ENHANCEMENT_SYSTEM_PROMPT, title, source_text),
            )
            .await
            .unwrap_or_else(|_| Err(Error::Timeout(format!("{} gave no answer in {:?}", provider.name(), self.timeout))));
            match answer.and_then(validate_enhancement) {
                Ok(enhancement) => {
                    tracing::info!("✨ Enhanced {} with {}", article_id, provider.name());
                    self.cache.put(article_id, enhancement.clone()).await;
                    return enhancement;
                }
                Err(e) => {
                    tracing::warn!("Enhancement provider {} failed for {}: {}", provider.name(), article_id, e);
                }
            }
        }

        tracing::warn!("All enhancement providers failed for {}, serving degraded content", article_id);
        ArticleEnhancement::degraded(title, source_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use np_storage::{MemoryStorage, PendingWrites};
    use np_core::ContentStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockProvider {
        name: &'static str,
        answer: Option<Value>,
        hangs: bool,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn ok(name: &'static str, answer: Value) -> Arc<Self> {
            Arc::new(Self { name, answer: Some(answer), hangs: false, calls: AtomicUsize::new(0) })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self { name, answer: None, hangs: false, calls: AtomicUsize::new(0) })
        }

        fn hanging(name: &'static str) -> Arc<Self> {
            Arc::new(Self { name, answer: None, hangs: true, calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EnhancementProvider for MockProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn request(&self, _system_prompt: &str, _title: &str, _text: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hangs {
                std::future::pending::<()>().await;
            }
            self.answer
                .clone()
                .ok_or_else(|| Error::Provider(format!("{} is down", self.name)))
        }
    }

    fn complete_answer(body: &str) -> Value {
        json!({
            "fullArticle": body,
            "summaryShort": "short",
            "summaryRomanUrdu": "khulasa",
            "summaryUrdu": "خلاصہ",
            "summaryHindi": "सारांश",
            "summaryTelugu": "సారాంశం",
            "fullArticleRomanUrdu": "tafseel",
            "fullArticleUrdu": "تفصیل",
            "fullArticleHindi": "विस्तार",
            "fullArticleTelugu": "వివరం"
        })
    }

    fn adapter(store: Arc<MemoryStorage>, providers: Vec<Arc<dyn EnhancementProvider>>) -> (EnhancementAdapter, PendingWrites) {
        let pending = PendingWrites::new();
        let cache = Arc::new(TextContentCache::for_enhancements(store, pending.clone()));
        (EnhancementAdapter::new(cache, providers), pending)
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let mut answer = complete_answer("body");
        answer.as_object_mut().unwrap().remove("fullArticleTelugu");
        assert!(matches!(validate_enhancement(answer), Err(Error::Parse(_))));

        assert!(validate_enhancement(complete_answer("   ")).is_err());
        assert!(validate_enhancement(json!("just a string")).is_err());
        assert!(validate_enhancement(complete_answer("body")).is_ok());
    }

    #[tokio::test]
    async fn test_second_call_hits_cache() {
        let primary = MockProvider::ok("primary", complete_answer("expanded"));
        let (adapter, _) = adapter(Arc::new(MemoryStorage::new()), vec![primary.clone()]);

        let first = adapter.enhance("rss_1", "T", "body").await;
        let second = adapter.enhance("rss_1", "T", "body").await;

        assert_eq!(first, second);
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_secondary_and_caches() {
        let primary = MockProvider::failing("primary");
        let secondary = MockProvider::ok("secondary", complete_answer("from secondary"));
        let store = Arc::new(MemoryStorage::new());
        let (adapter, pending) = adapter(store.clone(), vec![primary.clone(), secondary.clone()]);

        let result = adapter.enhance("rss_2", "T", "body").await;
        assert_eq!(result.full_article, "from secondary");
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);

        pending.flush().await;
        assert_eq!(store.get_enhancement("rss_2").await.unwrap(), Some(result));
    }

    #[tokio::test]
    async fn test_invalid_primary_answer_counts_as_failure() {
        let primary = MockProvider::ok("primary", json!({ "fullArticle": "half an answer" }));
        let secondary = MockProvider::ok("secondary", complete_answer("complete"));
        let (adapter, _) = adapter(Arc::new(MemoryStorage::new()), vec![primary, secondary.clone()]);

        assert_eq!(adapter.enhance("rss_3", "T", "body").await.full_article, "complete");
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn test_total_failure_is_degraded_and_not_cached() {
        let store = Arc::new(MemoryStorage::new());
        let (adapter, pending) = adapter(
            store.clone(),
            vec![MockProvider::failing("primary"), MockProvider::failing("secondary")],
        );

        let result = adapter.enhance("rss_4", "T", "body text").await;
        assert!(result.full_article.contains("body text"));

        pending.flush().await;
        assert!(adapter.cache().get("rss_4").await.is_none());
        assert!(store.get_enhancement("rss_4").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_primary_falls_through_to_secondary() {
        let primary = MockProvider::hanging("primary");
        let secondary = MockProvider::ok("secondary", complete_answer("from secondary"));
        let (adapter, _) = adapter(Arc::new(MemoryStorage::new()), vec![primary.clone(), secondary.clone()]);
        let adapter = adapter.with_timeout(Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        let result = adapter.enhance("rss_6", "T", "body").await;
        assert_eq!(result.full_article, "from secondary");
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_primary_and_failing_secondary_degrade() {
        let (adapter, pending) = adapter(
            Arc::new(MemoryStorage::new()),
            vec![MockProvider::hanging("primary"), MockProvider::failing("secondary")],
        );

        let result = tokio::time::timeout(Duration::from_secs(3600), adapter.enhance("rss_7", "T", "body text"))
            .await
            .expect("enhance should finish once the provider timeout expires");
        assert_eq!(result, ArticleEnhancement::degraded("T", "body text"));

        pending.flush().await;
        assert!(adapter.cache().get("rss_7").await.is_none());
    }

    #[tokio::test]
    async fn test_no_providers_configured() {
        let (adapter, _) = adapter(Arc::new(MemoryStorage::new()), vec![]);
        let result = adapter.enhance("rss_5", "Headline", "").await;
        assert_eq!(result.full_article, "Headline");
    }
}
