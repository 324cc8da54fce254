//! montsame.mn listing adapter. The site has no feed; timestamps are
//! relative phrases ("5 цагийн өмнө" rendered in Russian), resolved
//! against Moscow time and truncated to midnight.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use scraper::Html;

use super::{id_from_path, join_url, sel, SourceAdapter};
use crate::dates::ru_relative_offset;
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::types::{FeedItem, NormalizedFeed};

const URL_BASE: &str = "https://montsame.mn/ru/";
const MSK_OFFSET_HOURS: i64 = 3;

pub struct MontsameAdapter;

impl MontsameAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MontsameAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_document(html: &str, feed_url: &str, now: DateTime<Utc>) -> NormalizedFeed {
    let document = Html::parse_document(html);
    let item_sel = sel("div.news-box-list.mr-3");
    let link_sel = sel("a");
    let title_sel = sel("div.title");
    let stat_sel = sel("div.stat.d-block");

    let msk_now = now + Duration::hours(MSK_OFFSET_HOURS);
    let mut entries = Vec::new();

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
            .map(|t| t.text().collect::<String>());

        let published = item
            .select(&stat_sel)
            .next()
            .map(|s| s.text().collect::<String>())
            .and_then(|stat| ru_relative_offset(&stat))
            .map(|offset| {
                let local = msk_now - offset;
                local
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .map(|ndt| ndt.and_utc())
                    .unwrap_or(local)
            });

        entries.push(FeedItem {
            id: Some(id_from_path(href)),
            title,
            link: Some(join_url(URL_BASE, href)),
            extra_links: Vec::new(),
            published,
        });
    }

    NormalizedFeed {
        source_title: "montsame".to_string(),
        href: feed_url.to_string(),
        entries,
    }
}

#[async_trait]
impl SourceAdapter for MontsameAdapter {
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed {
        match fetcher.get_text(feed_url, FetchOptions::insecure()).await {
            Some(body) => parse_document(&body, feed_url, Utc::now()),
            None => NormalizedFeed::empty("montsame", feed_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PAGE: &str = r#"
    <html><body>
      <div class="news-box-list mr-3">
        <a href="/ru/read/309123"></a>
        <div class="title">Парламент одобрил бюджет</div>
        <div class="stat d-block">5 часов назад</div>
      </div>
      <div class="news-box-list mr-3">
        <a href="/ru/read/309124"></a>
        <div class="title">Визит делегации завершился</div>
        <div class="stat d-block">2 дня назад</div>
      </div>
    </body></html>"#;

    #[test]
    fn relative_times_resolve_to_moscow_midnights() {
        let now = Utc.with_ymd_and_hms(2023, 6, 10, 22, 30, 0).unwrap();
        let feed = parse_document(PAGE, "https://montsame.mn/ru/highlights", now);
        assert_eq!(feed.source_title, "montsame");
        assert_eq!(feed.entries.len(), 2);

        // 22:30 UTC is 01:30 MSK next day; minus 5h lands back on the 10th.
        assert_eq!(
            feed.entries[0].published,
            Some(Utc.with_ymd_and_hms(2023, 6, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(
            feed.entries[1].published,
            Some(Utc.with_ymd_and_hms(2023, 6, 9, 0, 0, 0).unwrap())
        );

        assert_eq!(feed.entries[0].id.as_deref(), Some("_ru_read_309123"));
        assert_eq!(
            feed.entries[0].link.as_deref(),
            Some("https://montsame.mn/ru/read/309123")
        );
        assert_eq!(
            feed.entries[0].title.as_deref(),
            Some("Парламент одобрил бюджет")
        );
    }
}
