//! Postgres persistence behind the [`Store`] trait.
//!
//! Every query is a runtime-checked `sqlx::query` so the crate builds
//! without a live database. Tests substitute an in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::info;

use crate::types::{ExcludedRecord, Feed, NewArticle, PendingArticle, Result};

#[async_trait]
pub trait Store: Send + Sync {
    /// Feeds eligible for a download pass: used, available, and with a
    /// real parser assigned. Ordered by name for stable run logs.
    async fn list_active_feeds(&self) -> Result<Vec<Feed>>;

    async fn feed_id_by_name(&self, name: &str) -> Result<Option<i32>>;

    /// Duplicate probe: same feed, exact title, published inside
    /// [start, end]. The URL is deliberately not part of the key.
    async fn article_exists(
        &self,
        feed_id: i32,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool>;

    async fn insert_article(&self, article: &NewArticle) -> Result<()>;

    async fn excluded_exists(
        &self,
        url: &str,
        title: &str,
        published: DateTime<Utc>,
    ) -> Result<bool>;

    async fn insert_excluded(&self, record: &ExcludedRecord) -> Result<()>;

    /// Articles still awaiting text extraction inside [start, end],
    /// joined with the name and tags of their still-active feed.
    async fn unparsed_articles(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PendingArticle>>;

    async fn mark_parsed(&self, article_id: i32, text: &str, sentiment: f64) -> Result<()>;
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;
        info!("database migrations are up to date");
        Ok(())
    }
}

fn feed_from_row(row: &sqlx::postgres::PgRow) -> std::result::Result<Feed, sqlx::Error> {
    Ok(Feed {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        url: row.try_get("url")?,
        tags: row.try_get("tags")?,
        used: row.try_get("used")?,
        available: row.try_get("available")?,
        parser_name: row.try_get("parser_name")?,
    })
}

#[async_trait]
impl Store for PgStore {
    async fn list_active_feeds(&self) -> Result<Vec<Feed>> {
        let rows = sqlx::query(
            "SELECT id, name, url, tags, used, available, parser_name \
             FROM newsfeedner_feed \
             WHERE used AND available AND parser_name <> 'no parser' \
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut feeds = Vec::with_capacity(rows.len());
        for row in &rows {
            feeds.push(feed_from_row(row)?);
        }
        Ok(feeds)
    }

    async fn feed_id_by_name(&self, name: &str) -> Result<Option<i32>> {
        let row = sqlx::query("SELECT id FROM newsfeedner_feed WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(match row {
            Some(row) => Some(row.try_get("id")?),
            None => None,
        })
    }

    async fn article_exists(
        &self,
        feed_id: i32,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS ( \
                SELECT 1 FROM newsfeedner_article \
                WHERE feed_id = $1 AND title = $2 \
                  AND published_parsed >= $3 AND published_parsed <= $4 \
             ) AS present",
        )
        .bind(feed_id)
        .bind(title)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("present")?)
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<()> {
        sqlx::query(
            "INSERT INTO newsfeedner_article \
             (id_in_feed, url, title, feed_id, published_parsed, \
              is_text_parsed, is_entities_parsed) \
             VALUES ($1, $2, $3, $4, $5, FALSE, FALSE)",
        )
        .bind(&article.id_in_feed)
        .bind(&article.url)
        .bind(&article.title)
        .bind(article.feed_id)
        .bind(article.published_parsed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn excluded_exists(
        &self,
        url: &str,
        title: &str,
        published: DateTime<Utc>,
    ) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS ( \
                SELECT 1 FROM excluded_filter \
                WHERE url = $1 AND title = $2 AND published_parsed = $3 \
             ) AS present",
        )
        .bind(url)
        .bind(title)
        .bind(published)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("present")?)
    }

    async fn insert_excluded(&self, record: &ExcludedRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO excluded_filter (url, title, published_parsed) \
             VALUES ($1, $2, $3)",
        )
        .bind(&record.url)
        .bind(&record.title)
        .bind(record.published_parsed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn unparsed_articles(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PendingArticle>> {
        let rows = sqlx::query(
            "SELECT a.id, a.url, a.title, a.feed_id, a.published_parsed, \
                    f.name AS feed_name, f.tags AS feed_tags \
             FROM newsfeedner_article a \
             JOIN newsfeedner_feed f ON f.id = a.feed_id \
             WHERE NOT a.is_text_parsed \
               AND f.used AND f.available \
               AND a.published_parsed >= $1 AND a.published_parsed <= $2 \
             ORDER BY a.published_parsed DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut pending = Vec::with_capacity(rows.len());
        for row in &rows {
            pending.push(PendingArticle {
                id: row.try_get("id")?,
                url: row.try_get("url")?,
                title: row.try_get("title")?,
                feed_id: row.try_get("feed_id")?,
                published_parsed: row.try_get("published_parsed")?,
                feed_name: row.try_get("feed_name")?,
                feed_tags: row.try_get("feed_tags")?,
            });
        }
        Ok(pending)
    }

    async fn mark_parsed(&self, article_id: i32, text: &str, sentiment: f64) -> Result<()> {
        sqlx::query(
            "UPDATE newsfeedner_article \
             SET text = $2, sentiment = $3, is_text_parsed = TRUE \
             WHERE id = $1",
        )
        .bind(article_id)
        .bind(text)
        .bind(sentiment)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
