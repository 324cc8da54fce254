//! reuters.com front-page adapter. Article metadata is embedded in the
//! page as Fusion bootstrap JSON; the HTML itself carries nothing.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::Value;

use super::{join_url, SourceAdapter};
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

const URL_BASE: &str = "https://www.reuters.com";

/// The two contentCache groups that carry article lists.
const ARTICLE_GROUPS: &[&str] = &[
    "articles-by-collection-alias-or-id-v1",
    "articles-by-section-alias-or-id-v1",
];

pub struct ReutersAdapter;

impl ReutersAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReutersAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Cut the two Fusion JSON blobs out of the page source:
/// `Fusion.globalContent` and `Fusion.contentCache`.
fn extract_blobs(html: &str) -> Option<(Value, Value)> {
    let after_global = html.split("globalContent=").nth(1)?;
    let mut parts = after_global.splitn(2, ";Fusion.globalContentConfig=");
    let global_raw = parts.next()?;
    let rest = parts.next()?;
    let cache_raw = rest
        .split(";Fusion.contentCache=")
        .nth(1)?
        .split(";Fusion.layout")
        .next()?;

    let global = serde_json::from_str(global_raw).ok()?;
    let cache = serde_json::from_str(cache_raw).ok()?;
    Some((global, cache))
}

fn item_from_article(article: &Value) -> Option<FeedItem> {
    let id = article.get("id")?.as_str()?.to_string();
    let title = article.get("title")?.as_str()?.to_string();
    let canonical = article.get("canonical_url")?.as_str()?;

    let published = article
        .get("published_time")
        .and_then(|t| t.as_str())
        .and_then(|t| t.get(..16))
        .and_then(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M").ok())
        .map(|ndt| ndt.and_utc());

    Some(FeedItem {
        id: Some(id),
        title: Some(title),
        link: Some(join_url(URL_BASE, canonical)),
        extra_links: Vec::new(),
        published,
    })
}

fn push_unique(entries: &mut Vec<FeedItem>, item: FeedItem) {
    if !entries.contains(&item) {
        entries.push(item);
    }
}

pub fn parse_document(html: &str, feed_url: &str) -> NormalizedFeed {
    let mut feed = NormalizedFeed::empty("reuters", feed_url);

    let Some((global, cache)) = extract_blobs(html) else {
        return feed;
    };

    if let Some(articles) = global
        .pointer("/result/articles")
        .and_then(|a| a.as_array())
    {
        for article in articles {
            if let Some(item) = item_from_article(article) {
                push_unique(&mut feed.entries, item);
            }
        }
    }

    for group in ARTICLE_GROUPS {
        let Some(entries) = cache.get(group).and_then(|g| g.as_object()) else {
            continue;
        };
        for cached in entries.values() {
            let Some(articles) = cached
                .pointer("/data/result/articles")
                .and_then(|a| a.as_array())
            else {
                continue;
            };
            for article in articles {
                if let Some(item) = item_from_article(article) {
                    push_unique(&mut feed.entries, item);
                }
            }
        }
    }

    feed
}

#[async_trait]
impl SourceAdapter for ReutersAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::default()).await {
            Some(body) => parse_document(&body, feed_url),
            None => NormalizedFeed::empty("reuters", feed_url),
        }
    }
}
