use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Age after which a feed snapshot triggers a live fetch.
pub const STALE_AFTER_MINUTES: i64 = 30;

/// Sample rate of the 16-bit mono PCM produced by speech providers.
pub const PCM_SAMPLE_RATE: u32 = 24_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Azad Studio")]
    Studio,
    Hyderabad,
    Telangana,
    India,
    International,
    Sports,
    Founders,
    Gallery,
}

/// How a category is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryRoute {
    /// Upstream RSS feeds behind the snapshot caches.
    Feed,
    /// Editorial posts read live from the persistent store.
    Studio,
    /// User-submitted posts read live from the persistent store.
    Gallery,
    /// Rendered by the UI alone; never has items.
    Static,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Studio,
        Category::Hyderabad,
        Category::Telangana,
        Category::India,
        Category::International,
        Category::Sports,
        Category::Founders,
        Category::Gallery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Studio => "Azad Studio",
            Category::Hyderabad => "Hyderabad",
            Category::Telangana => "Telangana",
            Category::India => "India",
            Category::International => "International",
            Category::Sports => "Sports",
            Category::Founders => "Founders",
            Category::Gallery => "Gallery",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Studio => "azad-studio",
            Category::Hyderabad => "hyderabad",
            Category::Telangana => "telangana",
            Category::India => "india",
            Category::International => "international",
            Category::Sports => "sports",
            Category::Founders => "founders",
            Category::Gallery => "gallery",
        }
    }

    pub fn route(&self) -> CategoryRoute {
        match self {
            Category::Studio => CategoryRoute::Studio,
            Category::Gallery => CategoryRoute::Gallery,
            Category::Founders => CategoryRoute::Static,
            _ => CategoryRoute::Feed,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['_', ' '], "-");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == wanted || (*c == Category::Studio && wanted == "studio"))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// A single news item as served to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedArticle {
    pub id: String,
    pub title: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category: Category,
    pub url: String,
}

/// Languages an article is translated into besides English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    RomanUrdu,
    Urdu,
    Hindi,
    Telugu,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::RomanUrdu,
        Language::Urdu,
        Language::Hindi,
        Language::Telugu,
    ];

    /// "Translation unavailable", written in the language itself.
    pub fn unavailable_message(&self) -> &'static str {
        match self {
            Language::RomanUrdu => "Tarjuma filhal dastiyab nahi hai.",
            Language::Urdu => "ترجمہ فی الحال دستیاب نہیں ہے۔",
            Language::Hindi => "अनुवाद फ़िलहाल उपलब्ध नहीं है।",
            Language::Telugu => "అనువాదం ప్రస్తుతం అందుబాటులో లేదు.",
        }
    }
}

/// AI-derived content for one article: the expanded English body plus
/// summaries and full translations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleEnhancement {
    pub full_article: String,
    pub summary_short: String,
    pub summary_roman_urdu: String,
    pub summary_urdu: String,
    pub summary_hindi: String,
    pub summary_telugu: String,
    pub full_article_roman_urdu: String,
    pub full_article_urdu: String,
    pub full_article_hindi: String,
    pub full_article_telugu: String,
}

impl ArticleEnhancement {
    /// Built from the input alone when every provider failed.
    pub fn degraded(title: &str, source_text: &str) -> Self {
        let body = if source_text.trim().is_empty() {
            title.to_string()
        } else {
            source_text.to_string()
        };
        let msg = |lang: Language| lang.unavailable_message().to_string();

        Self {
            full_article: body.clone(),
            summary_short: body,
            summary_roman_urdu: msg(Language::RomanUrdu),
            summary_urdu: msg(Language::Urdu),
            summary_hindi: msg(Language::Hindi),
            summary_telugu: msg(Language::Telugu),
            full_article_roman_urdu: msg(Language::RomanUrdu),
            full_article_urdu: msg(Language::Urdu),
            full_article_hindi: msg(Language::Hindi),
            full_article_telugu: msg(Language::Telugu),
        }
    }

    pub fn summary(&self, lang: Language) -> &str {
        match lang {
            Language::RomanUrdu => &self.summary_roman_urdu,
            Language::Urdu => &self.summary_urdu,
            Language::Hindi => &self.summary_hindi,
            Language::Telugu => &self.summary_telugu,
        }
    }

    pub fn full_article_in(&self, lang: Language) -> &str {
        match lang {
            Language::RomanUrdu => &self.full_article_roman_urdu,
            Language::Urdu => &self.full_article_urdu,
            Language::Hindi => &self.full_article_hindi,
            Language::Telugu => &self.full_article_telugu,
        }
    }
}

/// Synthesized speech, keyed by the content hash of its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub key: String,
    pub pcm: Vec<u8>,
}

impl AudioClip {
    pub fn new(key: impl Into<String>, pcm: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            pcm,
        }
    }

    /// Wraps the raw PCM in a RIFF/WAVE header so it can be played directly.
    pub fn to_wav(&self) -> Vec<u8> {
        let channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = PCM_SAMPLE_RATE * u32::from(channels) * u32::from(bits_per_sample) / 8;
        let block_align = channels * bits_per_sample / 8;
        let data_len = self.pcm.len() as u32;

        let mut wav = Vec::with_capacity(44 + self.pcm.len());
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&channels.to_le_bytes());
        wav.extend_from_slice(&PCM_SAMPLE_RATE.to_le_bytes());
        wav.extend_from_slice(&byte_rate.to_le_bytes());
        wav.extend_from_slice(&block_align.to_le_bytes());
        wav.extend_from_slice(&bits_per_sample.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.extend_from_slice(&self.pcm);
        wav
    }
}

/// All items fetched for one category at one point in time. Replaced whole,
/// never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub category: Category,
    pub articles: Vec<NormalizedArticle>,
    pub updated_at: DateTime<Utc>,
}

impl FeedSnapshot {
    pub fn new(category: Category, articles: Vec<NormalizedArticle>) -> Self {
        Self {
            category,
            articles,
            updated_at: Utc::now(),
        }
    }

    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.updated_at
    }

    pub fn is_fresh_at(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
        self.age_at(now) < stale_after
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioPost {
    pub id: i64,
    pub message: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryPost {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGalleryPost {
    pub title: String,
    pub description: String,
    pub media_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("Sports".parse::<Category>().unwrap(), Category::Sports);
        assert_eq!("azad studio".parse::<Category>().unwrap(), Category::Studio);
        assert_eq!("studio".parse::<Category>().unwrap(), Category::Studio);
        assert_eq!("INTERNATIONAL".parse::<Category>().unwrap(), Category::International);
        assert!("weather".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_routes() {
        assert_eq!(Category::Studio.route(), CategoryRoute::Studio);
        assert_eq!(Category::Gallery.route(), CategoryRoute::Gallery);
        assert_eq!(Category::Founders.route(), CategoryRoute::Static);
        assert_eq!(Category::India.route(), CategoryRoute::Feed);
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::Studio).unwrap();
        assert_eq!(json, "\"Azad Studio\"");
    }

    #[test]
    fn test_snapshot_staleness_boundary() {
        let now = Utc::now();
        let stale_after = Duration::minutes(STALE_AFTER_MINUTES);
        let mut snapshot = FeedSnapshot::new(Category::Sports, vec![]);

        snapshot.updated_at = now - Duration::minutes(29);
        assert!(snapshot.is_fresh_at(now, stale_after));

        snapshot.updated_at = now - Duration::minutes(31);
        assert!(!snapshot.is_fresh_at(now, stale_after));
    }

    #[test]
    fn test_degraded_enhancement_echoes_body() {
        let degraded = ArticleEnhancement::degraded("T", "body text");
        assert_eq!(degraded.full_article, "body text");
        for lang in Language::ALL {
            assert_eq!(degraded.summary(lang), lang.unavailable_message());
            assert_eq!(degraded.full_article_in(lang), lang.unavailable_message());
        }

        let from_title = ArticleEnhancement::degraded("Only a title", "  ");
        assert_eq!(from_title.full_article, "Only a title");
    }

    #[test]
    fn test_wav_header() {
        let clip = AudioClip::new("k", vec![0u8; 480]);
        let wav = clip.to_wav();
        assert_eq!(wav.len(), 44 + 480);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), PCM_SAMPLE_RATE);
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 480);
    }
}
