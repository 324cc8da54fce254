//! russian.cgtn.com section adapter. Timestamps read "29 Apr, 2022 00:30
//! GMT+8"; the zone suffix is dropped before parsing.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use scraper::Html;

use super::{sel, SourceAdapter};
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

pub struct CgtnAdapter;

impl CgtnAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CgtnAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn section_from_url(feed_url: &str) -> &str {
    feed_url.rsplit('/').next().unwrap_or(feed_url)
}

pub fn parse_document(html: &str, feed_url: &str) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let item_sel = sel("div.cg-content-description");
    let link_sel = sel("a");
    let time_sel = sel("div.cg-time");

    let section = section_from_url(feed_url);
    let mut feed = NormalizedFeed::empty(format!("cgtn_{section}"), feed_url);

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
                let trimmed = t.trim();
                let without_zone = trimmed.rsplit_once(' ').map(|(head, _)| head)?;
                NaiveDateTime::parse_from_str(without_zone, "%d %b, %Y %H:%M").ok()
            })
            .map(|ndt| ndt.and_utc());

        feed.entries.push(FeedItem {
            id: Some(href.to_string()),
            title: Some(anchor.text().collect::<String>().trim().to_string()),
            link: Some(href.to_string()),
            extra_links: Vec::new(),
            published,
        });
    }

    feed
}

#[async_trait]
impl SourceAdapter for CgtnAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::default()).await {
            Some(body) => parse_document(&body, feed_url),
            None => {
                let section = section_from_url(feed_url);
                NormalizedFeed::empty(format!("cgtn_{section}"), feed_url)
            }
        }
    }
}
