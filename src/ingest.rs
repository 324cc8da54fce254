//! The ingestion gate: decides, for each normalized feed item, whether
//! it becomes an article row, an excluded-filter row, or nothing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::dates::{clamp_month_rollover, window_bound};
use crate::fetcher::PageFetcher;
use crate::filter::TitleFilter;
use crate::sources::adapter_by_name;
use crate::store::Store;
use crate::types::{ExcludedRecord, Feed, FeedItem, NewArticle, Result};

/// Sources whose primary link field is unusable; the first alternate
/// link is taken instead.
const ALTERNATE_LINK_FEEDS: &[&str] = &["rbc", "aif"];

const ID_IN_FEED_MAX: usize = 400;
const URL_MAX: usize = 2048;

/// Marker of a double-encoded (CP1252-read-as-UTF-8) Cyrillic title.
const MOJIBAKE_MARKER: char = 'Ð';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Inserted into the article table.
    Accepted,
    /// Inserted into the excluded-filter table.
    Excluded,
    /// Not persisted anywhere.
    Dropped(DropReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The feed row disappeared between listing and ingestion, or the
    /// item lacks a link or title.
    MissingField,
    /// Published outside [start, end].
    OutsideWindow,
    /// Same feed, same title, published inside the window.
    DuplicateArticle,
    /// Identical excluded row already present.
    DuplicateExcluded,
    /// Title carries the mojibake marker.
    MojibakeTitle,
}

/// Last `n` characters of `s`, on char boundaries.
fn tail(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    match s.char_indices().nth(count - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

pub struct IngestionGate {
    store: Arc<dyn Store>,
    filter: Arc<dyn TitleFilter>,
}

impl IngestionGate {
    pub fn new(store: Arc<dyn Store>, filter: Arc<dyn TitleFilter>) -> Self {
        Self { store, filter }
    }

    /// Run one item through the gate. `start`/`end` bound the ingestion
    /// window; both sides are inclusive.
    pub async fn ingest(
        &self,
        feed: &Feed,
        item: &FeedItem,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<GateDecision> {
        let Some(feed_id) = self.store.feed_id_by_name(&feed.name).await? else {
            return Ok(GateDecision::Dropped(DropReason::MissingField));
        };

        let link = if ALTERNATE_LINK_FEEDS.contains(&feed.name.as_str()) {
            item.extra_links.first().cloned()
        } else {
            item.link.clone()
        };
        let Some(url) = link else {
            return Ok(GateDecision::Dropped(DropReason::MissingField));
        };

        let Some(raw_title) = item.title.as_deref() else {
            return Ok(GateDecision::Dropped(DropReason::MissingField));
        };
        let title = raw_title.replace('"', "");

        let id_in_feed = item.id.clone().unwrap_or_else(|| url.clone());
        let id_in_feed = tail(&id_in_feed, ID_IN_FEED_MAX).to_string();

        let published = match item.published {
            Some(ts) => clamp_month_rollover(ts),
            None => Utc::now(),
        };

        if published < start || published > end {
            return Ok(GateDecision::Dropped(DropReason::OutsideWindow));
        }

        if self.filter.is_excluded(&title) {
            // Duplicate probe uses the full URL; the insert truncates it.
            if self.store.excluded_exists(&url, &title, published).await? {
                return Ok(GateDecision::Dropped(DropReason::DuplicateExcluded));
            }
            self.store
                .insert_excluded(&ExcludedRecord {
                    url: tail(&url, URL_MAX).to_string(),
                    title,
                    published_parsed: published,
                })
                .await?;
            return Ok(GateDecision::Excluded);
        }

        if self
            .store
            .article_exists(feed_id, &title, start, end)
            .await?
        {
            return Ok(GateDecision::Dropped(DropReason::DuplicateArticle));
        }
        if title.contains(MOJIBAKE_MARKER) {
            return Ok(GateDecision::Dropped(DropReason::MojibakeTitle));
        }

        self.store
            .insert_article(&NewArticle {
                id_in_feed,
                url: tail(&url, URL_MAX).to_string(),
                title,
                feed_id,
                published_parsed: published,
            })
            .await?;
        Ok(GateDecision::Accepted)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub feeds_searched: usize,
    pub added: usize,
    pub excluded: usize,
    pub dropped: usize,
}

/// One download pass over every active feed.
pub struct FeedDownloader {
    store: Arc<dyn Store>,
    fetcher: PageFetcher,
    gate: IngestionGate,
    delta_days: i64,
}

impl FeedDownloader {
    pub fn new(
        store: Arc<dyn Store>,
        fetcher: PageFetcher,
        filter: Arc<dyn TitleFilter>,
        delta_days: i64,
    ) -> Self {
        let gate = IngestionGate::new(Arc::clone(&store), filter);
        Self {
            store,
            fetcher,
            gate,
            delta_days,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let start = window_bound(-self.delta_days);
        let end = window_bound(1);

        let feeds = self.store.list_active_feeds().await?;
        let mut summary = RunSummary::default();

        for feed in &feeds {
            let Some(adapter) = adapter_by_name(&feed.parser_name) else {
                warn!(feed = %feed.name, parser = %feed.parser_name, "unknown parser name");
                continue;
            };

            let normalized = adapter.parse(&self.fetcher, &feed.url).await;
            summary.feeds_searched += 1;
            info!(
                feed = %feed.name,
                id = feed.id,
                url = %feed.url,
                entries = normalized.entries.len(),
                "feed parsed"
            );

            let mut added = 0usize;
            let mut excluded = 0usize;
            for item in &normalized.entries {
                match self.gate.ingest(feed, item, start, end).await {
                    Ok(GateDecision::Accepted) => added += 1,
                    Ok(GateDecision::Excluded) => excluded += 1,
                    Ok(GateDecision::Dropped(_)) => summary.dropped += 1,
                    Err(e) => {
                        warn!(feed = %feed.name, error = %e, "failed to ingest item");
                    }
                }
            }
            info!(feed = %feed.name, added, excluded, "feed ingested");
            summary.added += added;
            summary.excluded += excluded;
        }

        info!(
            feeds = summary.feeds_searched,
            added = summary.added,
            excluded = summary.excluded,
            "download pass finished"
        );
        Ok(summary)
    }
}
