use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;

/// One network path to a raw feed document.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    fn name(&self) -> &str;

    /// Fetches `feed_url` and returns the unwrapped feed document.
    async fn fetch(&self, feed_url: &str) -> Result<String>;
}

/// An item exactly as the feed document describes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub description_html: Option<String>,
    pub image_url: Option<String>,
}

pub trait FeedParser: Send + Sync {
    fn parse(&self, payload: &str) -> Result<Vec<RawFeedItem>>;
}
