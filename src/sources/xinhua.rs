//! english.news.cn listing adapter.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use scraper::Html;

use super::{id_from_path, join_url, sel, SourceAdapter};
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

const URL_BASE: &str = "https://english.news.cn";

pub struct XinhuaAdapter;

impl XinhuaAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for XinhuaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_document(html: &str, feed_url: &str) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let item_sel = sel("div.tit");
    let link_sel = sel("a");
    let time_sel = sel("span.time");

    let mut feed = NormalizedFeed::empty("xinhua", feed_url);

    for item in document.select(&item_sel) {
        let Some(anchor) = item.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let published = item
            .select(&time_sel)
            .next()
            .map(|t| t.text().collect::<String>())
            .and_then(|t| {
                NaiveDateTime::parse_from_str(t.trim(), "%Y-%m-%d %H:%M:%S").ok()
            })
            .map(|ndt| ndt.and_utc());

        feed.entries.push(FeedItem {
            id: Some(id_from_path(href)),
            title: Some(anchor.text().collect::<String>()),
            link: Some(join_url(URL_BASE, href)),
            extra_links: Vec::new(),
            published,
        });
    }

    feed
}

#[async_trait]
impl SourceAdapter for XinhuaAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::default()).await {
            Some(body) => parse_document(&body, feed_url),
            None => NormalizedFeed::empty("xinhua", feed_url),
        }
    }
}
