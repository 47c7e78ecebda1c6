use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_STALE_AFTER_SECS: u64 = 30 * 60;
pub const DEFAULT_HEADLINE_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_HEADLINES_PER_CATEGORY: usize = 3;
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    /// No persistent store: every read misses, every write is dropped.
    #[default]
    None,
    Memory,
    Sqlite,
}

impl FromStr for StoreKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" | "off" => Ok(StoreKind::None),
            "memory" => Ok(StoreKind::Memory),
            "sqlite" => Ok(StoreKind::Sqlite),
            other => Err(Error::Config(format!("unknown store kind: {}", other))),
        }
    }
}

#[derive(Clone, Default)]
pub struct ProviderKeys {
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_tts_model: Option<String>,
    pub gemini_voice: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub openai_model: Option<String>,
    pub openai_tts_model: Option<String>,
    pub openai_voice: Option<String>,
}

impl std::fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderKeys")
            .field("gemini_api_key", &self.gemini_api_key.as_deref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_tts_model", &self.gemini_tts_model)
            .field("openai_api_key", &self.openai_api_key.as_deref().map(|_| "<redacted>"))
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("openai_tts_model", &self.openai_tts_model)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub snapshot_dir: Option<PathBuf>,
    pub providers: ProviderKeys,
    pub feed_timeout: Duration,
    /// Upper bound on one enhancement or speech provider attempt.
    pub provider_timeout: Duration,
    pub stale_after: Duration,
    pub headline_interval: Duration,
    pub headlines_per_category: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::None,
            database_url: None,
            snapshot_dir: None,
            providers: ProviderKeys::default(),
            feed_timeout: Duration::from_secs(DEFAULT_FEED_TIMEOUT_SECS),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            stale_after: Duration::from_secs(DEFAULT_STALE_AFTER_SECS),
            headline_interval: Duration::from_secs(DEFAULT_HEADLINE_INTERVAL_SECS),
            headlines_per_category: DEFAULT_HEADLINES_PER_CATEGORY,
        }
    }
}

/// Reads `key`, then `VITE_<key>`. Empty values count as unset.
pub fn env_var(key: &str) -> Option<String> {
    [key.to_string(), format!("VITE_{}", key)]
        .iter()
        .filter_map(|k| std::env::var(k).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env_var(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let store = match env_var("NP_STORE") {
            Some(kind) => kind.parse()?,
            None => StoreKind::None,
        };

        let providers = ProviderKeys {
            gemini_api_key: env_var("GEMINI_API_KEY").or_else(|| env_var("API_KEY")),
            gemini_model: env_var("GEMINI_MODEL"),
            gemini_tts_model: env_var("GEMINI_TTS_MODEL"),
            gemini_voice: env_var("GEMINI_VOICE"),
            openai_api_key: env_var("OPENAI_API_KEY"),
            openai_base_url: env_var("OPENAI_BASE_URL"),
            openai_model: env_var("OPENAI_MODEL"),
            openai_tts_model: env_var("OPENAI_TTS_MODEL"),
            openai_voice: env_var("OPENAI_VOICE"),
        };

        Ok(Self {
            store,
            database_url: env_var("NP_DATABASE_URL"),
            snapshot_dir: env_var("NP_SNAPSHOT_DIR").map(PathBuf::from),
            providers,
            feed_timeout: Duration::from_secs(env_parse("NP_FEED_TIMEOUT_SECS", DEFAULT_FEED_TIMEOUT_SECS)?),
            provider_timeout: Duration::from_secs(env_parse(
                "NP_PROVIDER_TIMEOUT_SECS",
                DEFAULT_PROVIDER_TIMEOUT_SECS,
            )?),
            stale_after: Duration::from_secs(env_parse("NP_STALE_AFTER_SECS", DEFAULT_STALE_AFTER_SECS)?),
            headline_interval: Duration::from_secs(env_parse(
                "NP_HEADLINE_INTERVAL_SECS",
                DEFAULT_HEADLINE_INTERVAL_SECS,
            )?),
            headlines_per_category: env_parse("NP_HEADLINES_PER_CATEGORY", DEFAULT_HEADLINES_PER_CATEGORY)?,
        })
    }
}
