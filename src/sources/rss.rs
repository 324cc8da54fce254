//! Generic RSS/Atom adapter used by every source that still publishes a
//! working feed.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;

use super::SourceAdapter;
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

pub struct RssAdapter {
    opts: FetchOptions,
}

impl RssAdapter {
    /// The default profile: patient timeout, TLS verified.
    pub fn common() -> Self {
        Self {
            opts: FetchOptions::default().with_timeout(Duration::from_secs(60)),
        }
    }

    /// Shorter timeout for mid.ru, which hangs rather than refuses.
    pub fn mid() -> Self {
        Self {
            opts: FetchOptions::default().with_timeout(Duration::from_secs(30)),
        }
    }
}

/// Map a raw feed document into entry items. The `extra_links` list
/// carries every alternate link so sources whose primary link is
/// unusable (rbc, aif) can be special-cased at ingestion.
pub fn parse_feed_document(xml: &str, source_href: &str) -> NormalizedFeed {
    let parsed = match parser::parse(xml.as_bytes()) {
        Ok(feed) => feed,
        Err(_) => return NormalizedFeed::empty("", source_href),
    };

    let source_title = parsed
        .title
        .map(|t| t.content)
        .unwrap_or_default();

    let entries = parsed
        .entries
        .into_iter()
        .map(|entry| {
            let extra_links: Vec<String> =
                entry.links.iter().map(|l| l.href.clone()).collect();
            FeedItem {
                id: Some(entry.id),
                title: entry.title.map(|t| t.content),
                link: extra_links.first().cloned(),
                extra_links,
                published: entry.published.or(entry.updated),
            }
        })
        .collect();

    NormalizedFeed {
        source_title,
        href: source_href.to_string(),
        entries,
    }
}

#[async_trait]
impl SourceAdapter for RssAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_page(feed_url, self.opts).await {
            Some(page) => parse_feed_document(&page.body, &page.final_url),
            None => NormalizedFeed::empty("", feed_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>exportcenter</title>
    <link>https://www.exportcenter.ru/press_center/</link>
    <item>
      <guid>https://www.exportcenter.ru/press_center/news/1001/</guid>
      <title>Export volumes grew in the first quarter</title>
      <link>https://www.exportcenter.ru/press_center/news/1001/</link>
      <pubDate>Tue, 18 Apr 2023 10:30:00 GMT</pubDate>
    </item>
    <item>
      <guid>no-date-item</guid>
      <title>Undated announcement</title>
      <link>https://www.exportcenter.ru/press_center/news/1002/</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn rss_entries_are_normalized() {
        let feed = parse_feed_document(RSS_SAMPLE, "https://www.exportcenter.ru/rss");
        assert_eq!(feed.source_title, "exportcenter");
        assert_eq!(feed.href, "https://www.exportcenter.ru/rss");
        assert_eq!(feed.entries.len(), 2);

        let first = &feed.entries[0];
        assert_eq!(
            first.title.as_deref(),
            Some("Export volumes grew in the first quarter")
        );
        assert_eq!(
            first.link.as_deref(),
            Some("https://www.exportcenter.ru/press_center/news/1001/")
        );
        assert!(first.published.is_some());
        assert!(!first.extra_links.is_empty());

        // Missing pubDate stays None; the gate substitutes now().
        assert!(feed.entries[1].published.is_none());
    }

    #[test]
    fn broken_xml_yields_empty_feed() {
        let feed = parse_feed_document("<html>not a feed</html>", "https://example.com");
        assert!(feed.entries.is_empty());
    }
}
