//! english.ahram.org.eg business-portal adapter. The page only renders
//! its item list for POST requests, and carries no usable timestamps, so
//! every entry is stamped with the fetch time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scraper::Html;

use super::{id_from_path, join_url, sel, SourceAdapter};
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

const URL_BASE: &str = "https://english.ahram.org.eg/Portal/3/Business.aspx";

pub struct AhramAdapter;

impl AhramAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AhramAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_document(html: &str, feed_url: &str, now: DateTime<Utc>) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let item_sel = sel("div.col-md-6.col-lg-12.mar-top-outer");
    let link_sel = sel("a");

    let mut feed = NormalizedFeed::empty("ahram", feed_url);

    for item in document.select(&item_sel) {
        let Some(anchor) = item.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        feed.entries.push(FeedItem {
            id: Some(id_from_path(href)),
            title: Some(anchor.text().collect::<String>().trim().to_string()),
            link: Some(join_url(URL_BASE, href)),
            extra_links: Vec::new(),
            published: Some(now),
        });
    }

    feed
}

#[async_trait]
impl SourceAdapter for AhramAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        let opts = FetchOptions {
            verify_tls: false,
            ..FetchOptions::post()
        };
        match fetcher.get_text(feed_url, opts).await {
            Some(body) => parse_document(&body, feed_url, Utc::now()),
            None => NormalizedFeed::empty("ahram", feed_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PAGE: &str = r#"
    <html><body>
      <div class="col-md-6 col-lg-12 mar-top-outer">
        <a href="/NewsContent/3/12/490001/Business/Economy/title.aspx">
          Egypt signs grain import deal
        </a>
      </div>
    </body></html>"#;

    #[test]
    fn entries_are_stamped_with_fetch_time() {
        let now = Utc.with_ymd_and_hms(2023, 4, 18, 13, 0, 0).unwrap();
        let feed = parse_document(PAGE, URL_BASE, now);
        assert_eq!(feed.entries.len(), 1);

        let entry = &feed.entries[0];
        assert_eq!(entry.title.as_deref(), Some("Egypt signs grain import deal"));
        assert_eq!(entry.published, Some(now));
        assert_eq!(
            entry.link.as_deref(),
            Some("https://english.ahram.org.eg/NewsContent/3/12/490001/Business/Economy/title.aspx")
        );
    }
}
