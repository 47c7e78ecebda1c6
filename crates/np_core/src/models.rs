use async_trait::async_trait;

use crate::Result;

/// An external model that expands, summarizes and translates an article.
#[async_trait]
pub trait EnhancementProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the model's structured JSON answer, unvalidated.
    async fn request(
        &self,
        system_prompt: &str,
        article_title: &str,
        article_text: &str,
    ) -> Result<serde_json::Value>;
}

/// An external model that reads text aloud.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Returns 24 kHz mono 16-bit little-endian PCM.
    async fn request(&self, text: &str) -> Result<Vec<u8>>;
}
