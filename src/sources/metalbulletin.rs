//! metalbulletin.ru news table adapter. The listing is a single table:
//! date header rows (distinguished by a bgcolor attribute) followed by
//! time/title rows that inherit the preceding header's date.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use super::{sel, SourceAdapter};
use crate::dates::RU_MONTH_ABBREV;
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

static DATE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2})\s(\w+)\.\s(\d{4})").expect("date-header regex"));

pub struct MetalBulletinAdapter;

impl MetalBulletinAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetalBulletinAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// "18 апр. 2023" style header.
fn parse_date_header(text: &str) -> Option<NaiveDate> {
    let squashed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let caps = DATE_HEADER.captures(&squashed)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month_word = caps.get(2)?.as_str().to_lowercase();
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;
    let month = RU_MONTH_ABBREV
        .iter()
        .find(|(abbrev, _)| *abbrev == month_word)
        .map(|&(_, m)| m)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_clock(text: &str) -> Option<(u32, u32)> {
    let (hour, minute) = text.trim().split_once(':')?;
    Some((hour.parse().ok()?, minute.parse().ok()?))
}

pub fn parse_document(html: &str, feed_url: &str) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let row_sel = sel("div.one_news table tr");
    let cell_sel = sel("td");
    let link_sel = sel("a");

    let mut feed = NormalizedFeed::empty("metalbulletin", feed_url);
    let mut current_date: Option<NaiveDate> = None;

    for row in document.select(&row_sel) {
        if row.value().attr("bgcolor").is_some() {
            current_date = parse_date_header(&row.text().collect::<String>());
            continue;
        }

        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.len() != 2 {
            continue;
        }
        let Some(date) = current_date else { continue };

        let Some((hour, minute)) = parse_clock(&cells[0].text().collect::<String>()) else {
            continue;
        };
        let Some(href) = cells[1]
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        let published: Option<DateTime<Utc>> = date
            .and_hms_opt(hour, minute, 0)
            .map(|ndt| ndt.and_utc());

        feed.entries.push(FeedItem {
            id: Some(href.to_string()),
            title: Some(cells[1].text().collect::<String>()),
            link: Some(href.to_string()),
            extra_links: Vec::new(),
            published,
        });
    }

    feed
}

#[async_trait]
impl SourceAdapter for MetalBulletinAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::default()).await {
            Some(body) => parse_document(&body, feed_url),
            None => NormalizedFeed::empty("metalbulletin", feed_url),
        }
    }
}
