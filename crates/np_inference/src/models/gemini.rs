use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use np_core::{EnhancementProvider, Error, Result, SpeechProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parse_model_json;
use crate::prompt::user_prompt;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
const DEFAULT_VOICE: &str = "Kore";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

fn text_part(text: String) -> Content {
    Content {
        parts: vec![Part {
            text: Some(text),
            inline_data: None,
        }],
    }
}

impl GenerateResponse {
    fn first_parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates.iter().take(1).flat_map(|c| c.content.parts.iter())
    }

    fn text(&self) -> Option<String> {
        let text: String = self.first_parts().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn inline_audio(&self) -> Option<&str> {
        self.first_parts()
            .filter_map(|p| p.inline_data.as_ref())
            .map(|d| d.data.as_str())
            .find(|d| !d.is_empty())
    }
}

async fn generate(client: &Client, api_key: &str, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
    let response = client
        .post(format!("{}/models/{}:generateContent", BASE_URL, model))
        .header("x-goog-api-key", api_key)
        .json(request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Provider(format!("gemini returned {}: {}", status, body)));
    }
    Ok(response.json::<GenerateResponse>().await?)
}

/// Article enhancement through the Gemini `generateContent` endpoint in JSON
/// response mode.
pub struct GeminiModel {
    client: Arc<Client>,
    api_key: String,
    model: String,
}

impl GeminiModel {
    pub fn new(client: Arc<Client>, api_key: String, model: Option<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl EnhancementProvider for GeminiModel {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn request(&self, system_prompt: &str, article_title: &str, article_text: &str) -> Result<Value> {
        let request = GenerateRequest {
            system_instruction: Some(text_part(system_prompt.to_string())),
            contents: vec![text_part(user_prompt(article_title, article_text))],
            generation_config: GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                ..Default::default()
            },
        };

        let response = generate(&self.client, &self.api_key, &self.model, &request).await?;
        let text = response
            .text()
            .ok_or_else(|| Error::Provider("gemini answered without text".to_string()))?;
        parse_model_json(&text)
    }
}

/// Speech synthesis through a Gemini TTS model. The answer carries base64
/// encoded 24 kHz mono 16-bit PCM.
pub struct GeminiSpeech {
    client: Arc<Client>,
    api_key: String,
    model: String,
    voice: String,
}

impl GeminiSpeech {
    pub fn new(client: Arc<Client>, api_key: String, model: Option<String>, voice: Option<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
            voice: voice.unwrap_or_else(|| DEFAULT_VOICE.to_string()),
        }
    }
}

impl fmt::Debug for GeminiSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSpeech")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("voice", &self.voice)
            .finish()
    }
}

#[async_trait]
impl SpeechProvider for GeminiSpeech {
    fn name(&self) -> &str {
        "gemini-tts"
    }

    async fn request(&self, text: &str) -> Result<Vec<u8>> {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![text_part(text.to_string())],
            generation_config: GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                }),
                ..Default::default()
            },
        };

        let response = generate(&self.client, &self.api_key, &self.model, &request).await?;
        let encoded = response
            .inline_audio()
            .ok_or_else(|| Error::Provider("gemini answered without audio".to_string()))?;

        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| Error::Parse(format!("gemini audio is not valid base64: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> GenerateResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_is_joined_from_first_candidate() {
        let parsed = response(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"a\":" }, { "text": " 1}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }));
        assert_eq!(parsed.text().as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_empty_answers_have_no_text_or_audio() {
        let parsed = response(json!({ "candidates": [] }));
        assert!(parsed.text().is_none());
        assert!(parsed.inline_audio().is_none());

        let blocked = response(json!({ "candidates": [{ "finishReason": "SAFETY" }] }));
        assert!(blocked.text().is_none());
    }

    #[test]
    fn test_inline_audio_is_found() {
        let parsed = response(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "audio/L16;rate=24000", "data": "AAEC" } }
            ] } }]
        }));
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(parsed.inline_audio().unwrap())
            .unwrap();
        assert_eq!(decoded, vec![0, 1, 2]);
    }

    #[test]
    fn test_speech_request_shape() {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![text_part("hello".to_string())],
            generation_config: GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: "Kore".to_string(),
                        },
                    },
                }),
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("systemInstruction").is_none());
        assert_eq!(value["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            value["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Kore"
        );
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
    }
}
