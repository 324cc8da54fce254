//! In-memory [`Store`] used by the gate and pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use newsfeedner::store::Store;
use newsfeedner::types::{ExcludedRecord, Feed, NewArticle, PendingArticle, Result};

#[derive(Debug, Clone)]
pub struct StoredArticle {
    pub id: i32,
    pub article: NewArticle,
    pub is_text_parsed: bool,
    pub text: Option<String>,
    pub sentiment: Option<f64>,
}

#[derive(Default)]
struct State {
    feeds: Vec<Feed>,
    articles: Vec<StoredArticle>,
    excluded: Vec<ExcludedRecord>,
    next_id: i32,
}

#[derive(Default)]
pub struct MemStore {
    state: Mutex<State>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(self, feed: Feed) -> Self {
        self.state.lock().unwrap().feeds.push(feed);
        self
    }

    pub fn add_article(&self, article: NewArticle) -> i32 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.articles.push(StoredArticle {
            id,
            article,
            is_text_parsed: false,
            text: None,
            sentiment: None,
        });
        id
    }

    pub fn articles(&self) -> Vec<StoredArticle> {
        self.state.lock().unwrap().articles.clone()
    }

    pub fn excluded(&self) -> Vec<ExcludedRecord> {
        self.state.lock().unwrap().excluded.clone()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn list_active_feeds(&self) -> Result<Vec<Feed>> {
        let mut feeds: Vec<Feed> = self
            .state
            .lock()
            .unwrap()
            .feeds
            .iter()
            .filter(|f| f.used && f.available && f.parser_name != "no parser")
            .cloned()
            .collect();
        feeds.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(feeds)
    }

    async fn feed_id_by_name(&self, name: &str) -> Result<Option<i32>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .feeds
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.id))
    }

    async fn article_exists(
        &self,
        feed_id: i32,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self.state.lock().unwrap().articles.iter().any(|a| {
            a.article.feed_id == feed_id
                && a.article.title == title
                && a.article.published_parsed >= start
                && a.article.published_parsed <= end
        }))
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<()> {
        self.add_article(article.clone());
        Ok(())
    }

    async fn excluded_exists(
        &self,
        url: &str,
        title: &str,
        published: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self.state.lock().unwrap().excluded.iter().any(|e| {
            e.url == url && e.title == title && e.published_parsed == published
        }))
    }

    async fn insert_excluded(&self, record: &ExcludedRecord) -> Result<()> {
        self.state.lock().unwrap().excluded.push(record.clone());
        Ok(())
    }

    async fn unparsed_articles(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PendingArticle>> {
        let state = self.state.lock().unwrap();
        let mut pending: Vec<PendingArticle> = state
            .articles
            .iter()
            .filter(|a| {
                !a.is_text_parsed
                    && a.article.published_parsed >= start
                    && a.article.published_parsed <= end
            })
            .filter_map(|a| {
                let feed = state
                    .feeds
                    .iter()
                    .find(|f| f.id == a.article.feed_id && f.used && f.available)?;
                Some(PendingArticle {
                    id: a.id,
                    url: a.article.url.clone(),
                    title: a.article.title.clone(),
                    feed_id: a.article.feed_id,
                    published_parsed: a.article.published_parsed,
                    feed_name: feed.name.clone(),
                    feed_tags: feed.tags.clone(),
                })
            })
            .collect();
        pending.sort_by(|a, b| b.published_parsed.cmp(&a.published_parsed));
        Ok(pending)
    }

    async fn mark_parsed(&self, article_id: i32, text: &str, sentiment: f64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(article) = state.articles.iter_mut().find(|a| a.id == article_id) {
            article.is_text_parsed = true;
            article.text = Some(text.to_string());
            article.sentiment = Some(sentiment);
        }
        Ok(())
    }
}

pub fn feed(id: i32, name: &str, parser_name: &str) -> Feed {
    Feed {
        id,
        name: name.to_string(),
        url: format!("https://{name}.example.com/feed"),
        tags: "news ru".to_string(),
        used: true,
        available: true,
        parser_name: parser_name.to_string(),
    }
}
