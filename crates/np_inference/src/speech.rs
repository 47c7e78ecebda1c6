use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use np_core::config::DEFAULT_PROVIDER_TIMEOUT_SECS;
use np_core::ids::audio_cache_key;
use np_core::{AudioClip, Error, Result, SpeechProvider};
use np_storage::AudioContentCache;
use regex::Regex;

/// Longest text handed to a speech provider.
pub const MAX_SPEECH_CHARS: usize = 2000;

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"(?i)\b(?:https?://|www\.)\S+").unwrap();
    static ref MARKUP_RE: Regex = Regex::new(r"[*#_`~\[\]{}()<>|]").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Strips URLs and markdown/bracket punctuation, then collapses whitespace.
pub fn normalize_for_speech(text: &str) -> String {
    let without_urls = URL_RE.replace_all(text, " ");
    let without_markup = MARKUP_RE.replace_all(&without_urls, " ");
    WHITESPACE_RE.replace_all(&without_markup, " ").trim().to_string()
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Synthesizes speech, trying providers strictly in order. Unlike enhancement
/// this can fail outwardly: either the text has nothing speakable left or
/// every provider failed.
pub struct SpeechAdapter {
    cache: Arc<AudioContentCache>,
    providers: Vec<Arc<dyn SpeechProvider>>,
    timeout: Duration,
}

impl SpeechAdapter {
    pub fn new(cache: Arc<AudioContentCache>, providers: Vec<Arc<dyn SpeechProvider>>) -> Self {
        Self {
            cache,
            providers,
            timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &Arc<AudioContentCache> {
        &self.cache
    }

    pub async fn synthesize(&self, text: &str) -> Result<AudioClip> {
        let normalized = normalize_for_speech(text);
        if normalized.is_empty() {
            return Err(Error::EmptySpeechText);
        }

        let key = audio_cache_key(&normalized);
        if let Some(clip) = self.cache.get(&key).await {
            return Ok(clip);
        }

        let speakable = truncate_chars(&normalized, MAX_SPEECH_CHARS);
        for provider in &self.providers {
            let attempt = tokio::time::timeout(self.timeout, provider.request(speakable))
                .await
                .unwrap_or_else(|_| Err(Error::Timeout(format!("{} gave no audio in {:?}", provider.name(), self.timeout))));
            match attempt {
                Ok(pcm) if !pcm.is_empty() => {
                    tracing::info!("🔊 Synthesized {} ({} bytes) with {}", key, pcm.len(), provider.name());
                    let clip = AudioClip::new(key.clone(), pcm);
                    self.cache.put(&key, clip.clone()).await;
                    return Ok(clip);
                }
                Ok(_) => {
                    tracing::warn!("Speech provider {} returned no audio for {}", provider.name(), key);
                }
                Err(e) => {
                    tracing::warn!("Speech provider {} failed for {}: {}", provider.name(), key, e);
                }
            }
        }

        Err(Error::SpeechUnavailable(format!(
            "no speech provider could synthesize {} ({} tried)",
            key,
            self.providers.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use np_storage::{MemoryStorage, PendingWrites};
    use std::sync::Mutex;

    struct MockSpeech {
        name: &'static str,
        audio: Option<Vec<u8>>,
        hangs: bool,
        seen: Mutex<Vec<String>>,
    }

    impl MockSpeech {
        fn new(name: &'static str, audio: Option<Vec<u8>>) -> Arc<Self> {
            Arc::new(Self {
                name,
                audio,
                hangs: false,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn hanging(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                audio: None,
                hangs: true,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SpeechProvider for MockSpeech {
        fn name(&self) -> &str {
            self.name
        }

        async fn request(&self, text: &str) -> Result<Vec<u8>> {
            self.seen.lock().unwrap().push(text.to_string());
            if self.hangs {
                std::future::pending::<()>().await;
            }
            self.audio
                .clone()
                .ok_or_else(|| Error::Provider(format!("{} is down", self.name)))
        }
    }

    fn adapter(providers: Vec<Arc<dyn SpeechProvider>>) -> SpeechAdapter {
        let cache = AudioContentCache::for_audio(Arc::new(MemoryStorage::new()), PendingWrites::new());
        SpeechAdapter::new(Arc::new(cache), providers)
    }

    #[test]
    fn test_normalize_for_speech() {
        assert_eq!(
            normalize_for_speech("**Breaking**: see https://example.com/x?y=1 and www.news.in now"),
            "Breaking : see and now"
        );
        assert_eq!(normalize_for_speech("  [link](  )\n\n## "), "link");
        assert_eq!(normalize_for_speech("*** ### ``` "), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "ह".repeat(5);
        assert_eq!(truncate_chars(&text, 3).chars().count(), 3);
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[tokio::test]
    async fn test_empty_text_fails_without_calling_providers() {
        let provider = MockSpeech::new("primary", Some(vec![1]));
        let adapter = adapter(vec![provider.clone()]);

        let result = adapter.synthesize("[](**) https://t.co/abc").await;
        assert!(matches!(result, Err(Error::EmptySpeechText)));
        assert!(provider.seen().is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_and_caches() {
        let primary = MockSpeech::new("primary", None);
        let secondary = MockSpeech::new("secondary", Some(vec![1, 2, 3, 4]));
        let adapter = adapter(vec![primary.clone(), secondary.clone()]);

        let clip = adapter.synthesize("Hello from *Hyderabad*").await.unwrap();
        assert_eq!(clip.pcm, vec![1, 2, 3, 4]);
        assert_eq!(clip.key, audio_cache_key("Hello from Hyderabad"));
        assert_eq!(secondary.seen(), vec!["Hello from Hyderabad".to_string()]);

        let again = adapter.synthesize("Hello from Hyderabad").await.unwrap();
        assert_eq!(again, clip);
        assert_eq!(primary.seen().len(), 1);
        assert_eq!(secondary.seen().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_audio_counts_as_failure() {
        let primary = MockSpeech::new("primary", Some(Vec::new()));
        let secondary = MockSpeech::new("secondary", Some(vec![7]));
        let adapter = adapter(vec![primary, secondary.clone()]);

        assert_eq!(adapter.synthesize("text").await.unwrap().pcm, vec![7]);
    }

    #[tokio::test]
    async fn test_long_text_is_truncated_for_providers() {
        let provider = MockSpeech::new("primary", Some(vec![1]));
        let adapter = adapter(vec![provider.clone()]);

        let long = "word ".repeat(1000);
        adapter.synthesize(&long).await.unwrap();
        assert_eq!(provider.seen()[0].chars().count(), MAX_SPEECH_CHARS);
    }

    #[tokio::test]
    async fn test_all_providers_failing_is_unavailable() {
        let adapter = adapter(vec![MockSpeech::new("primary", None), MockSpeech::new("secondary", None)]);

        let result = adapter.synthesize("Some news").await;
        assert!(matches!(result, Err(Error::SpeechUnavailable(_))));
        assert!(adapter.cache().get(&audio_cache_key("Some news")).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_primary_falls_through_to_secondary() {
        let primary = MockSpeech::hanging("primary");
        let secondary = MockSpeech::new("secondary", Some(vec![5, 6]));
        let adapter = adapter(vec![primary.clone(), secondary.clone()]).with_timeout(Duration::from_secs(5));

        let clip = adapter.synthesize("Late news").await.unwrap();
        assert_eq!(clip.pcm, vec![5, 6]);
        assert_eq!(primary.seen().len(), 1);
        assert_eq!(secondary.seen().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_only_provider_is_unavailable() {
        let adapter = adapter(vec![MockSpeech::hanging("primary")]);

        let result = tokio::time::timeout(Duration::from_secs(3600), adapter.synthesize("Late news"))
            .await
            .expect("synthesize should finish once the provider timeout expires");
        assert!(matches!(result, Err(Error::SpeechUnavailable(_))));
    }
}
