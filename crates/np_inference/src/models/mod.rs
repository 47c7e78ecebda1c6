use std::sync::Arc;
use std::time::Duration;

use np_core::{EnhancementProvider, Error, ProviderKeys, Result, SpeechProvider};
use reqwest::Client;
use serde_json::Value;

pub mod gemini;
pub mod openai;

pub use gemini::{GeminiModel, GeminiSpeech};
pub use openai::{OpenAiCompatModel, OpenAiSpeech};

/// Shared HTTP client whose requests give up after `timeout`.
pub fn provider_client(timeout: Duration) -> Arc<Client> {
    Arc::new(
        Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new()),
    )
}

/// Enhancement providers in fallback order. A provider whose key is missing
/// is left out.
pub fn create_enhancement_providers(keys: &ProviderKeys, timeout: Duration) -> Vec<Arc<dyn EnhancementProvider>> {
    let client = provider_client(timeout);
    let mut providers: Vec<Arc<dyn EnhancementProvider>> = Vec::new();

    if let Some(key) = &keys.gemini_api_key {
        providers.push(Arc::new(GeminiModel::new(client.clone(), key.clone(), keys.gemini_model.clone())));
    }
    if let Some(key) = &keys.openai_api_key {
        providers.push(Arc::new(OpenAiCompatModel::new(
            client.clone(),
            key.clone(),
            keys.openai_base_url.clone(),
            keys.openai_model.clone(),
        )));
    }

    if providers.is_empty() {
        tracing::warn!("No enhancement provider keys configured, articles will be served degraded");
    }
    providers
}

/// Speech providers in fallback order. A provider whose key is missing is
/// left out.
pub fn create_speech_providers(keys: &ProviderKeys, timeout: Duration) -> Vec<Arc<dyn SpeechProvider>> {
    let client = provider_client(timeout);
    let mut providers: Vec<Arc<dyn SpeechProvider>> = Vec::new();

    if let Some(key) = &keys.gemini_api_key {
        providers.push(Arc::new(GeminiSpeech::new(
            client.clone(),
            key.clone(),
            keys.gemini_tts_model.clone(),
            keys.gemini_voice.clone(),
        )));
    }
    if let Some(key) = &keys.openai_api_key {
        providers.push(Arc::new(OpenAiSpeech::new(
            client.clone(),
            key.clone(),
            keys.openai_base_url.clone(),
            keys.openai_tts_model.clone(),
            keys.openai_voice.clone(),
        )));
    }

    if providers.is_empty() {
        tracing::warn!("No speech provider keys configured, audio requests will fail");
    }
    providers
}

/// Models often wrap JSON in a markdown fence even when asked not to.
pub fn parse_model_json(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(body).map_err(|e| Error::Parse(format!("model did not answer with JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_json_strips_fences() {
        let plain = parse_model_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(plain["a"], 1);

        let fenced = parse_model_json("```json\n{\"a\": 2}\n```").unwrap();
        assert_eq!(fenced["a"], 2);

        let bare_fence = parse_model_json("```\n{\"a\": 3}\n```  ").unwrap();
        assert_eq!(bare_fence["a"], 3);

        assert!(parse_model_json("Sorry, I cannot help with that").is_err());
    }

    #[test]
    fn test_missing_keys_leave_providers_out() {
        let timeout = Duration::from_secs(30);
        assert!(create_enhancement_providers(&ProviderKeys::default(), timeout).is_empty());
        assert!(create_speech_providers(&ProviderKeys::default(), timeout).is_empty());

        let keys = ProviderKeys {
            gemini_api_key: Some("g".to_string()),
            openai_api_key: Some("o".to_string()),
            ..Default::default()
        };
        let names: Vec<String> = create_enhancement_providers(&keys, timeout)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["gemini", "openai"]);

        let only_openai = ProviderKeys {
            openai_api_key: Some("o".to_string()),
            ..Default::default()
        };
        let speech = create_speech_providers(&only_openai, timeout);
        assert_eq!(speech.len(), 1);
        assert_eq!(speech[0].name(), "openai-tts");
    }
}
