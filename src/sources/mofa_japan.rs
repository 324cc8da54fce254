//! mofa.go.jp press-release adapter. Release dates are grouped: a
//! `dt.list-title` holds a month-day heading ("April 14", no year) and
//! the following `dd` holds that day's links.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use scraper::{ElementRef, Html};

use super::{join_url, sel, SourceAdapter};
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

const URL_BASE: &str = "https://www.mofa.go.jp";

const EN_MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

pub struct MofaJapanAdapter;

impl MofaJapanAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MofaJapanAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// "April 14" heading. The year is inferred from `now`; a December
/// heading read in January belongs to the previous year.
fn parse_heading(text: &str, now: DateTime<Utc>) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let month_word = parts.next()?.to_lowercase();
    let day: u32 = parts.next()?.trim_matches(',').parse().ok()?;
    let month = EN_MONTHS.iter().position(|m| *m == month_word)? as u32 + 1;

    let year = if month == 12 && now.month() == 1 {
        now.year() - 1
    } else {
        now.year()
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn parse_document(html: &str, feed_url: &str, now: DateTime<Utc>) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let heading_sel = sel("dt.list-title");
    let link_sel = sel("a");

    let mut feed = NormalizedFeed::empty("mofa_japan", feed_url);

    for heading in document.select(&heading_sel) {
        let published = parse_heading(&heading.text().collect::<String>(), now)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|ndt| ndt.and_utc());

        // The day's releases live in the dd that follows the heading.
        let Some(dd) = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "dd")
        else {
            continue;
        };

        for anchor in dd.select(&link_sel) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            feed.entries.push(FeedItem {
                id: Some(href.to_string()),
                title: Some(anchor.text().collect::<String>()),
                link: Some(join_url(URL_BASE, href)),
                extra_links: Vec::new(),
                published,
            });
        }
    }

    feed
}

#[async_trait]
impl SourceAdapter for MofaJapanAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::default()).await {
            Some(body) => parse_document(&body, feed_url, Utc::now()),
            None => NormalizedFeed::empty("mofa_japan", feed_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PAGE: &str = r#"
    <html><body>
      <dl>
        <dt class="list-title">April 14</dt>
        <dd>
          <a href="/press/release/press4e_003301.html">Foreign Minister meets trade delegation</a>
          <a href="/press/release/press4e_003302.html">Joint statement on economic cooperation</a>
        </dd>
        <dt class="list-title">April 13</dt>
        <dd>
          <a href="/press/release/press4e_003300.html">Exchange of notes signed</a>
        </dd>
      </dl>
    </body></html>"#;

    #[test]
    fn headings_date_their_following_links() {
        let now = Utc.with_ymd_and_hms(2023, 4, 15, 12, 0, 0).unwrap();
        let feed = parse_document(PAGE, "https://www.mofa.go.jp/press/release/index.html", now);
        assert_eq!(feed.entries.len(), 3);

        assert_eq!(
            feed.entries[0].published,
            Some(Utc.with_ymd_and_hms(2023, 4, 14, 0, 0, 0).unwrap())
        );
        assert_eq!(
            feed.entries[1].published,
            Some(Utc.with_ymd_and_hms(2023, 4, 14, 0, 0, 0).unwrap())
        );
        assert_eq!(
            feed.entries[2].published,
            Some(Utc.with_ymd_and_hms(2023, 4, 13, 0, 0, 0).unwrap())
        );
        assert_eq!(
            feed.entries[0].link.as_deref(),
            Some("https://www.mofa.go.jp/press/release/press4e_003301.html")
        );
    }

    #[test]
    fn december_heading_read_in_january_is_last_year() {
        let january = Utc.with_ymd_and_hms(2024, 1, 4, 9, 0, 0).unwrap();
        assert_eq!(
            parse_heading("December 28", january),
            NaiveDate::from_ymd_opt(2023, 12, 28)
        );
        assert_eq!(
            parse_heading("January 3", january),
            NaiveDate::from_ymd_opt(2024, 1, 3)
        );
    }
}
