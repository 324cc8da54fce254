//! Adapters for the Russian government-site family: economy.gov.ru,
//! mintrans.gov.ru, and eec.eaeunion.org. All three date their items
//! with genitive month names ("14 апреля 2022"); economy.gov.ru adds a
//! clock time.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use scraper::Html;

use super::{id_from_path, join_url, sel, SourceAdapter};
use crate::dates::RU_MONTH_GENITIVE;
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

/// "14 апреля 2022" with an optional trailing "10:30".
fn parse_ru_date(text: &str) -> Option<DateTime<Utc>> {
    let mut parts = text.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month_word = parts.next()?.to_lowercase();
    let year: i32 = parts.next()?.parse().ok()?;
    let month = RU_MONTH_GENITIVE
        .iter()
        .find(|(name, _)| *name == month_word)
        .map(|&(_, m)| m)?;

    let (hour, minute) = match parts.next().and_then(|t| t.split_once(':')) {
        Some((h, m)) => (h.parse().ok()?, m.parse().ok()?),
        None => (0, 0),
    };

    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(hour, minute, 0)
        .map(|ndt| ndt.and_utc())
}

fn clean(text: &str) -> String {
    text.trim().trim_matches('\n').trim().to_string()
}

pub struct MinEconDevelAdapter;

impl MinEconDevelAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MinEconDevelAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_econ_document(html: &str, feed_url: &str) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let item_sel = sel("div.e-news__content");
    let link_sel = sel("a");
    let date_sel = sel("div.e-news__date");

    let mut feed = NormalizedFeed::empty("min.econom", feed_url);

    for item in document.select(&item_sel) {
        let Some(anchor) = item.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let published = item
            .select(&date_sel)
            .next()
            .map(|d| clean(&d.text().collect::<String>()))
            .and_then(|d| parse_ru_date(&d));

        feed.entries.push(FeedItem {
            id: Some(id_from_path(href)),
            title: Some(clean(&anchor.text().collect::<String>())),
            link: Some(join_url("https://economy.gov.ru/material/news/", href)),
            extra_links: Vec::new(),
            published,
        });
    }

    feed
}

#[async_trait]
impl SourceAdapter for MinEconDevelAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::insecure()).await {
            Some(body) => parse_econ_document(&body, feed_url),
            None => NormalizedFeed::empty("min.econom", feed_url),
        }
    }
}

pub struct MinTransAdapter;

impl MinTransAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MinTransAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_mintrans_document(html: &str, feed_url: &str) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let item_sel = sel("div.news-list-item");
    let any_link_sel = sel("a");
    let title_sel = sel("a.news-text");
    let date_sel = sel("span.date-span");

    let mut feed = NormalizedFeed::empty("mintrans", feed_url);

    for item in document.select(&item_sel) {
        let Some(href) = item
            .select(&any_link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        let title = item
            .select(&title_sel)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string());

        let published = item
            .select(&date_sel)
            .next()
            .map(|d| clean(&d.text().collect::<String>()))
            .and_then(|d| parse_ru_date(&d));

        feed.entries.push(FeedItem {
            id: Some(id_from_path(href)),
            title,
            link: Some(join_url("https://mintrans.gov.ru/press-center/news", href)),
            extra_links: Vec::new(),
            published,
        });
    }

    feed
}

#[async_trait]
impl SourceAdapter for MinTransAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::insecure()).await {
            Some(body) => parse_mintrans_document(&body, feed_url),
            None => NormalizedFeed::empty("mintrans", feed_url),
        }
    }
}

pub struct EaeunionAdapter;

impl EaeunionAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EaeunionAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_eaeunion_document(html: &str, feed_url: &str) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let item_sel = sel("div.news-pane-item");
    let link_sel = sel("a.news-pane-item__body");
    let title_sel = sel("span.news-pane-item__h");
    let date_sel = sel("span.news-pane-item__date");

    let mut feed = NormalizedFeed::empty("euraz.econ.com", feed_url);

    for item in document.select(&item_sel) {
        let Some(href) = item
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        let title = item
            .select(&title_sel)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string());

        let published = item
            .select(&date_sel)
            .next()
            .map(|d| clean(&d.text().collect::<String>()))
            .and_then(|d| parse_ru_date(&d));

        feed.entries.push(FeedItem {
            id: Some(id_from_path(href)),
            title,
            link: Some(join_url("https://eec.eaeunion.org/news/", href)),
            extra_links: Vec::new(),
            published,
        });
    }

    feed
}

#[async_trait]
impl SourceAdapter for EaeunionAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::insecure()).await {
            Some(body) => parse_eaeunion_document(&body, feed_url),
            None => NormalizedFeed::empty("euraz.econ.com", feed_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn genitive_dates_parse_with_and_without_time() {
        assert_eq!(
            parse_ru_date("14 апреля 2022 10:30"),
            Some(Utc.with_ymd_and_hms(2022, 4, 14, 10, 30, 0).unwrap())
        );
        assert_eq!(
            parse_ru_date("7 Сентября 2023"),
            Some(Utc.with_ymd_and_hms(2023, 9, 7, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_ru_date("вчера"), None);
    }

    #[test]
    fn econ_items_are_normalized() {
        let page = r#"
        <div class="e-news__content">
          <a href="/material/news/ekonomika_42.html">
            Министерство представило прогноз
          </a>
          <div class="e-news__date">18 апреля 2023 11:00</div>
        </div>"#;
        let feed = parse_econ_document(page, "https://economy.gov.ru/material/news/");
        assert_eq!(feed.source_title, "min.econom");
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(
            feed.entries[0].title.as_deref(),
            Some("Министерство представило прогноз")
        );
        assert_eq!(
            feed.entries[0].link.as_deref(),
            Some("https://economy.gov.ru/material/news/ekonomika_42.html")
        );
    }

    #[test]
    fn eaeunion_items_are_normalized() {
        let page = r#"
        <div class="news-pane-item">
          <a class="news-pane-item__body" href="/news/18-04-2023-1/">
            <span class="news-pane-item__h">Совет утвердил регламент</span>
            <span class="news-pane-item__date">18 апреля 2023</span>
          </a>
        </div>"#;
        let feed = parse_eaeunion_document(page, "https://eec.eaeunion.org/news/");
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(
            feed.entries[0].title.as_deref(),
            Some("Совет утвердил регламент")
        );
        assert_eq!(feed.entries[0].id.as_deref(), Some("_news_18-04-2023-1_"));
    }
}
