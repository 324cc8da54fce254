//! apnews.com hub adapter.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use scraper::Html;

use super::{join_url, sel, SourceAdapter};
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

const URL_BASE: &str = "https://apnews.com";

pub struct ApNewsAdapter;

impl ApNewsAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ApNewsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_document(html: &str, feed_url: &str) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let card_sel = sel("div.FeedCard");
    let heading_sel = sel("h2.-cardHeading");
    let headline_link_sel = sel("a[data-key=\"card-headline\"]");
    let fallback_link_sel = sel("a[class^=\"Component-link\"]");
    let timestamp_sel = sel("span[data-key=\"timestamp\"]");

    let mut feed = NormalizedFeed::empty("apnews", feed_url);

    for card in document.select(&card_sel) {
        let Some(heading) = card.select(&heading_sel).next() else {
            continue;
        };

        let href = card
            .select(&headline_link_sel)
            .next()
            .or_else(|| card.select(&fallback_link_sel).next())
            .and_then(|a| a.value().attr("href"));
        let Some(href) = href else { continue };

        let published = card
            .select(&timestamp_sel)
            .next()
            .and_then(|s| s.value().attr("data-source"))
            .and_then(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%SZ").ok())
            .map(|ndt| ndt.and_utc());

        feed.entries.push(FeedItem {
            id: Some(href.to_string()),
            title: Some(heading.text().collect::<String>()),
            link: Some(join_url(URL_BASE, href)),
            extra_links: Vec::new(),
            published,
        });
    }

    feed
}

#[async_trait]
impl SourceAdapter for ApNewsAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::default()).await {
            Some(body) => parse_document(&body, feed_url),
            None => NormalizedFeed::empty("apnews", feed_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const PAGE: &str = r#"
    <html><body>
      <div class="FeedCard">
        <a data-key="card-headline" href="/article/economy-rates-xyz">
          <h2 class="-cardHeading">Central bank holds rates steady</h2>
        </a>
        <span data-key="timestamp" data-source="2023-04-18T16:05:00Z">2 hours ago</span>
      </div>
      <div class="FeedCard">
        <a class="Component-link-0-2-117" href="/article/trade-deal-abc">
          <h2 class="-cardHeading">Trade deal reached after talks</h2>
        </a>
        <span data-key="timestamp" data-source="2023-04-18T12:00:00Z">6 hours ago</span>
      </div>
    </body></html>"#;

    #[test]
    fn feed_cards_are_normalized() {
        let feed = parse_document(PAGE, "https://apnews.com/hub/ap-top-news");
        assert_eq!(feed.entries.len(), 2);

        let first = &feed.entries[0];
        assert_eq!(first.id.as_deref(), Some("/article/economy-rates-xyz"));
        assert_eq!(
            first.title.as_deref(),
            Some("Central bank holds rates steady")
        );
        assert_eq!(
            first.link.as_deref(),
            Some("https://apnews.com/article/economy-rates-xyz")
        );
        assert_eq!(
            first.published,
            Some(Utc.with_ymd_and_hms(2023, 4, 18, 16, 5, 0).unwrap())
        );

        // Cards without the data-key anchor fall back to the class link.
        assert_eq!(feed.entries[1].id.as_deref(), Some("/article/trade-deal-abc"));
    }
}
