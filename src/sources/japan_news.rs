//! japannews.yomiuri.co.jp category listing adapter. The category name
//! from the URL tail becomes part of the source title.

use async_trait::async_trait;
use chrono::NaiveDate;
use scraper::Html;

use super::{sel, SourceAdapter};
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

pub struct JapanNewsAdapter;

impl JapanNewsAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JapanNewsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn category_from_url(feed_url: &str) -> &str {
    feed_url
        .trim_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(feed_url)
}

pub fn parse_document(html: &str, feed_url: &str) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let item_sel = sel("li.clearfix");
    let title_sel = sel("h2");
    let link_sel = sel("a");
    let date_sel = sel("p");

    let category = category_from_url(feed_url);
    let mut feed = NormalizedFeed::empty(format!("japan_news_{category}"), feed_url);

    for item in document.select(&item_sel) {
        let Some(title) = item.select(&title_sel).next() else {
            continue;
        };
        let Some(href) = item
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        // "April 18, 2023 - Business" style byline.
        let published = item
            .select(&date_sel)
            .next()
            .map(|p| p.text().collect::<String>())
            .and_then(|line| {
                let date_part = line.split(" - ").next()?.trim().to_string();
                NaiveDate::parse_from_str(&date_part, "%B %d, %Y").ok()
            })
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|ndt| ndt.and_utc());

        feed.entries.push(FeedItem {
            id: Some(href.to_string()),
            title: Some(title.text().collect::<String>()),
            link: Some(href.to_string()),
            extra_links: Vec::new(),
            published,
        });
    }

    feed
}

#[async_trait]
impl SourceAdapter for JapanNewsAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::default()).await {
            Some(body) => parse_document(&body, feed_url),
            None => {
                let category = category_from_url(feed_url);
                NormalizedFeed::empty(format!("japan_news_{category}"), feed_url)
            }
        }
    }
}
