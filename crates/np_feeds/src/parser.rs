use feed_rs::model::Entry;
use feed_rs::parser;
use np_core::{Error, FeedParser, RawFeedItem, Result};

/// RSS, Atom and JSON Feed documents through `feed-rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RssParser;

impl RssParser {
    pub fn new() -> Self {
        Self
    }

    fn media_image(entry: &Entry) -> Option<String> {
        let content = entry
            .media
            .iter()
            .flat_map(|m| m.content.iter())
            .find_map(|c| c.url.as_ref().map(|u| u.to_string()));

        content.or_else(|| {
            entry
                .media
                .iter()
                .flat_map(|m| m.thumbnails.iter())
                .map(|t| t.image.uri.clone())
                .find(|uri| !uri.is_empty())
        })
    }

    fn to_raw(entry: Entry) -> RawFeedItem {
        let image_url = Self::media_image(&entry);
        let description_html = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body));

        RawFeedItem {
            title: entry.title.map(|t| t.content),
            link: entry.links.into_iter().map(|l| l.href).next(),
            published: entry.published.or(entry.updated),
            description_html,
            image_url,
        }
    }
}

impl FeedParser for RssParser {
    fn parse(&self, payload: &str) -> Result<Vec<RawFeedItem>> {
        let feed = parser::parse(payload.as_bytes()).map_err(|e| Error::Parse(e.to_string()))?;
        Ok(feed.entries.into_iter().map(Self::to_raw).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Sport</title>
    <link>https://example.com/sport</link>
    <description>Sport news</description>
    <item>
      <title>India win the series</title>
      <link>https://example.com/sport/1</link>
      <pubDate>Mon, 06 Jan 2025 10:00:00 GMT</pubDate>
      <description><![CDATA[<p>A <b>thrilling</b> finish.</p>]]></description>
      <media:content url="https://img.example.com/1.jpg" medium="image"/>
    </item>
    <item>
      <title>Second story</title>
      <link>https://example.com/sport/2</link>
      <description><![CDATA[<img src="https://img.example.com/2.jpg"/> Text]]></description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_rss_items() {
        let items = RssParser::new().parse(RSS).unwrap();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.title.as_deref(), Some("India win the series"));
        assert_eq!(first.link.as_deref(), Some("https://example.com/sport/1"));
        assert!(first.published.is_some());
        assert!(first.description_html.as_deref().unwrap().contains("<b>thrilling</b>"));
        assert_eq!(first.image_url.as_deref(), Some("https://img.example.com/1.jpg"));

        let second = &items[1];
        assert!(second.published.is_none());
        assert!(second.image_url.is_none());
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(RssParser::new().parse("<html><body>Service Unavailable").is_err());
        assert!(RssParser::new().parse("").is_err());
    }
}
