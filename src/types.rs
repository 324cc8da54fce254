use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configured news source. Managed by an external admin process; this
/// crate only reads feeds, it never creates or updates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub id: i32,
    pub name: String,
    pub url: String,
    /// Locale hint, e.g. contains "ru" for Russian-language sources.
    pub tags: String,
    pub used: bool,
    pub available: bool,
    /// Selects the source adapter; "no parser" disables the feed.
    pub parser_name: String,
}

/// One normalized candidate article emitted by a source adapter, before
/// the ingestion gate has seen it. All fields are best-effort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
    /// Source-local id, often derived from the URL path.
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    /// Alternate list-of-links shape used by two legacy RSS sources.
    pub extra_links: Vec<String>,
    /// Absent when the source's timestamp could not be parsed; the gate
    /// substitutes ingestion time.
    pub published: Option<DateTime<Utc>>,
}

/// Adapter output: one source's entries in feedparser-result shape.
#[derive(Debug, Clone)]
pub struct NormalizedFeed {
    pub source_title: String,
    pub href: String,
    pub entries: Vec<FeedItem>,
}

impl NormalizedFeed {
    /// The soft-failure value: a reachable-but-empty (or unreachable)
    /// source produces this rather than an error.
    pub fn empty(source_title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            source_title: source_title.into(),
            href: href.into(),
            entries: Vec::new(),
        }
    }
}

/// Insert payload for an accepted article. `is_text_parsed` starts false;
/// the text pipeline fills `text`/`sentiment` later.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub id_in_feed: String,
    pub url: String,
    pub title: String,
    pub feed_id: i32,
    pub published_parsed: DateTime<Utc>,
}

/// Row written when an item fails the stop-word filter inside the
/// ingestion window.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedRecord {
    pub url: String,
    pub title: String,
    pub published_parsed: DateTime<Utc>,
}

/// An article awaiting text extraction, joined with the feed columns the
/// pipeline needs (name for scraper dispatch, tags for the language hint).
#[derive(Debug, Clone)]
pub struct PendingArticle {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub feed_id: i32,
    pub published_parsed: DateTime<Utc>,
    pub feed_name: String,
    pub feed_tags: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("sentiment scorer error: {0}")]
    Scorer(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
