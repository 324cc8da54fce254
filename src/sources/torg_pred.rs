//! Trade-mission sites at `<cc>.minpromtorg.gov.ru`. Listing data comes
//! from a JSON API; the page itself is a JS shell.

use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::SourceAdapter;
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

static COUNTRY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https://(\w+)\.").expect("country-code regex"));

/// Items older than this are noise from the site's archive import.
const CUTOFF: NaiveDate = match NaiveDate::from_ymd_opt(2022, 12, 25) {
    Some(d) => d,
    None => panic!("valid cutoff date"),
};

pub struct TorgPredAdapter;

impl TorgPredAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TorgPredAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn country_code(feed_url: &str) -> Option<&str> {
    COUNTRY_CODE
        .captures(feed_url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn parse_api_response(json: &serde_json::Value, feed_url: &str, code: &str) -> NormalizedFeed {
    let mut feed = NormalizedFeed::empty(format!("torg_pred_{code}"), feed_url);

    let Some(data) = json.get("data").and_then(|d| d.as_array()) else {
        return feed;
    };

    for item in data {
        let Some(id) = item.get("id") else { continue };
        let id = match id.as_i64() {
            Some(n) => n.to_string(),
            None => match id.as_str() {
                Some(s) => s.to_string(),
                None => continue,
            },
        };

        let published = item
            .get("date")
            .and_then(|d| d.as_str())
            .and_then(|d| d.get(..10))
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        let Some(date) = published else { continue };
        if date < CUTOFF {
            continue;
        }

        let title = item
            .get("title")
            .and_then(|t| t.as_str())
            .map(|t| t.trim().to_string());

        feed.entries.push(FeedItem {
            id: Some(id.clone()),
            title,
            link: Some(format!("https://{code}.minpromtorg.gov.ru/news?id={id}")),
            extra_links: Vec::new(),
            published: date.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc()),
        });
    }

    feed
}

#[async_trait]
impl SourceAdapter for TorgPredAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        let Some(code) = country_code(feed_url) else {
            return NormalizedFeed::empty("torg_pred", feed_url);
        };
        let api_url = format!(
            "https://{code}.minpromtorg.gov.ru/api/ssp-news/v1/?isCurrentSiteOnly=true&per_page=20&page=1"
        );
        match fetcher.get_json(&api_url, FetchOptions::insecure()).await {
            Some(json) => parse_api_response(&json, feed_url, code),
            None => NormalizedFeed::empty(format!("torg_pred_{code}"), feed_url),
        }
    }
}
