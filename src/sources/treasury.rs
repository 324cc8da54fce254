//! home.treasury.gov press-release adapter.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use scraper::Html;

use super::{join_url, sel, SourceAdapter};
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

const URL_BASE: &str = "https://home.treasury.gov";

pub struct TreasuryAdapter;

impl TreasuryAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TreasuryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_document(html: &str, feed_url: &str) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let item_sel = sel("div.content--2col__body div");
    let headline_sel = sel("h3 a");
    let time_sel = sel("time");

    let mut feed = NormalizedFeed::empty("us_department_of_treasury", feed_url);

    for item in document.select(&item_sel) {
        // Rows without an h3 headline are layout wrappers.
        let Some(headline) = item.select(&headline_sel).next() else {
            continue;
        };
        let Some(href) = headline.value().attr("href") else {
            continue;
        };

        let published = item
            .select(&time_sel)
            .next()
            .and_then(|t| t.value().attr("datetime"))
            .and_then(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%SZ").ok())
            .map(|ndt| ndt.and_utc());

        feed.entries.push(FeedItem {
            id: Some(href.to_string()),
            title: Some(headline.text().collect::<String>()),
            link: Some(join_url(URL_BASE, href)),
            extra_links: Vec::new(),
            published,
        });
    }

    feed
}

#[async_trait]
impl SourceAdapter for TreasuryAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::default()).await {
            Some(body) => parse_document(&body, feed_url),
            None => NormalizedFeed::empty("us_department_of_treasury", feed_url),
        }
    }
}
