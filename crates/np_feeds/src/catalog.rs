use std::collections::HashMap;

use np_core::Category;

const HYDERABAD: &[&str] = &[
    "https://www.thehindu.com/news/cities/Hyderabad/feeder/default.rss",
    "https://telanganatoday.com/hyderabad/feed",
    "https://www.siasat.com/hyderabad/feed/",
];

const TELANGANA: &[&str] = &[
    "https://www.thehindu.com/news/telangana/feeder/default.rss",
    "https://telanganatoday.com/telangana/feed",
    "https://www.siasat.com/telangana/feed/",
];

const INDIA: &[&str] = &[
    "https://www.ndtv.com/news/national/feeder/default.rss",
    "https://timesofindia.indiatimes.com/rssfeeds/-2128936835.cms",
    "https://www.hindustantimes.com/feeds/rss/india-news/rssfeed.xml",
    "https://www.tribuneindia.com/rss/feed/nation",
];

const INTERNATIONAL: &[&str] = &[
    "https://www.ndtv.com/news/international/feeder/default.rss",
    "https://feeds.bbci.co.uk/news/world/rss.xml",
    "https://www.aljazeera.com/xml/rss/all.xml",
    "https://www.theguardian.com/world/rss",
];

const SPORTS: &[&str] = &[
    "https://www.thehindu.com/sport/feeder/default.rss",
    "https://www.espncricinfo.com/rss/content/story/feeds/0.xml",
    "https://sports.ndtv.com/rss/all",
];

/// Upstream feed URLs per category. Categories without sources fetch nothing.
#[derive(Debug, Clone)]
pub struct FeedCatalog {
    sources: HashMap<Category, Vec<String>>,
}

impl Default for FeedCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        for (category, urls) in [
            (Category::Hyderabad, HYDERABAD),
            (Category::Telangana, TELANGANA),
            (Category::India, INDIA),
            (Category::International, INTERNATIONAL),
            (Category::Sports, SPORTS),
        ] {
            catalog.set(category, urls.iter().map(|u| u.to_string()).collect());
        }
        catalog
    }
}

impl FeedCatalog {
    pub fn empty() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    pub fn with_sources(mut self, category: Category, urls: Vec<String>) -> Self {
        self.set(category, urls);
        self
    }

    pub fn set(&mut self, category: Category, urls: Vec<String>) {
        self.sources.insert(category, urls);
    }

    pub fn sources(&self, category: Category) -> &[String] {
        self.sources.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}
