use std::collections::HashSet;

use lazy_static::lazy_static;
use np_core::ids::article_id_for_link;
use np_core::{Category, NormalizedArticle, RawFeedItem};
use regex::Regex;
use scraper::Html;

pub const DESCRIPTION_CHARS: usize = 200;
pub const UNTITLED: &str = "No Title";

lazy_static! {
    static ref IMG_SRC_RE: Regex = Regex::new(r#"<img[^>]+src="([^">]+)""#).unwrap();
}

/// `https://feeds.bbci.co.uk/news` becomes `BBCI`.
pub fn source_label(feed_url: &str) -> String {
    let host = url::Url::parse(feed_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();

    let host = host.replacen("www.", "", 1).replacen("feeds.", "", 1);
    match host.split('.').next() {
        Some(label) if !label.is_empty() => label.to_uppercase(),
        _ => "RSS".to_string(),
    }
}

/// Plain text of the description HTML, cut to [`DESCRIPTION_CHARS`] and
/// always suffixed with `...`.
pub fn clean_description(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    let cut: String = text.trim().chars().take(DESCRIPTION_CHARS).collect();
    format!("{}...", cut)
}

pub fn first_image_src(html: &str) -> Option<String> {
    IMG_SRC_RE.captures(html).map(|c| c[1].to_string())
}

pub fn normalize_item(item: RawFeedItem, source: &str, category: Category) -> NormalizedArticle {
    let description_html = item.description_html.unwrap_or_default();
    let link = item.link.unwrap_or_default();
    let image_url = item
        .image_url
        .filter(|u| !u.is_empty())
        .or_else(|| first_image_src(&description_html));

    NormalizedArticle {
        id: article_id_for_link(&link),
        title: item
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string()),
        source: source.to_string(),
        published_at: item.published,
        description: clean_description(&description_html),
        image_url,
        category,
        url: link,
    }
}

/// Lowercased alphanumerics only.
pub fn title_key(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Drops every article whose [`title_key`] was already seen; first wins.
pub fn dedup_by_title(articles: Vec<NormalizedArticle>) -> Vec<NormalizedArticle> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|a| seen.insert(title_key(&a.title)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> NormalizedArticle {
        normalize_item(
            RawFeedItem {
                title: Some(title.to_string()),
                link: Some(format!("https://example.com/{}", title.len())),
                ..Default::default()
            },
            "EXAMPLE",
            Category::India,
        )
    }

    #[test]
    fn test_source_label() {
        assert_eq!(source_label("https://feeds.bbci.co.uk/news/world/rss.xml"), "BBCI");
        assert_eq!(source_label("https://www.thehindu.com/sport/feeder/default.rss"), "THEHINDU");
        assert_eq!(source_label("https://sports.ndtv.com/rss/all"), "SPORTS");
        assert_eq!(source_label("not a url"), "RSS");
    }

    #[test]
    fn test_clean_description() {
        assert_eq!(clean_description("<p>A <b>thrilling</b> finish.</p>"), "A thrilling finish....");
        assert_eq!(clean_description(""), "...");

        let long = format!("<div>{}</div>", "x".repeat(500));
        assert_eq!(clean_description(&long).chars().count(), DESCRIPTION_CHARS + 3);
    }

    #[test]
    fn test_image_falls_back_to_description() {
        let item = RawFeedItem {
            description_html: Some(r#"<img class="a" src="https://img/2.jpg"/> Text"#.to_string()),
            ..Default::default()
        };
        let normalized = normalize_item(item, "X", Category::Sports);
        assert_eq!(normalized.image_url.as_deref(), Some("https://img/2.jpg"));
        assert_eq!(normalized.title, UNTITLED);
        assert_eq!(normalized.id, article_id_for_link(""));
    }

    #[test]
    fn test_dedup_ignores_case_and_punctuation() {
        let deduped = dedup_by_title(vec![
            article("India wins!"),
            article("india WINS"),
            article("India wins."),
            article("Rain delays match"),
        ]);
        let titles: Vec<&str> = deduped.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["India wins!", "Rain delays match"]);
    }

    #[test]
    fn test_dedup_keeps_non_latin_titles_apart() {
        let deduped = dedup_by_title(vec![article("హైదరాబాద్ వార్తలు"), article("తెలంగాణ వార్తలు")]);
        assert_eq!(deduped.len(), 2);
    }
}
