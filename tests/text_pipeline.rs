//! Text-pass behavior with a canned extractor and scorer.

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use common::{feed, MemStore};
use newsfeedner::fetcher::PageFetcher;
use newsfeedner::sentiment::SentimentScorer;
use newsfeedner::text::{ExtractText, Lang};
use newsfeedner::textpipe::TextPipeline;
use newsfeedner::types::{NewArticle, Result};

/// Returns the same body for every URL.
struct CannedExtractor {
    body: Option<String>,
}

#[async_trait]
impl ExtractText for CannedExtractor {
    async fn extract(
        &self,
        _fetcher: &PageFetcher,
        _feed_name: &str,
        _url: &str,
        _lang: Lang,
    ) -> Option<String> {
        self.body.clone()
    }
}

/// Fixed score, remembering what it was asked to score.
struct CannedScorer {
    score: f64,
    inputs: Mutex<Vec<String>>,
}

impl CannedScorer {
    fn new(score: f64) -> Self {
        Self {
            score,
            inputs: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SentimentScorer for CannedScorer {
    async fn score(&self, text: &str) -> Result<f64> {
        self.inputs.lock().unwrap().push(text.to_string());
        Ok(self.score)
    }
}

fn store_with_article(title: &str) -> (Arc<MemStore>, i32) {
    let store = Arc::new(MemStore::new().with_feed(feed(1, "exportcenter", "CommonParser")));
    let id = store.add_article(NewArticle {
        id_in_feed: "item-1".to_string(),
        url: "https://exportcenter.example.com/a1".to_string(),
        title: title.to_string(),
        feed_id: 1,
        published_parsed: Utc::now() - Duration::hours(6),
    });
    (store, id)
}

fn pipeline(
    store: Arc<MemStore>,
    extractor: CannedExtractor,
    scorer: Arc<CannedScorer>,
) -> TextPipeline {
    TextPipeline::new(
        store,
        PageFetcher::new().unwrap(),
        Arc::new(extractor),
        scorer,
        30,
    )
}

#[tokio::test]
async fn extracted_article_is_scored_and_marked_parsed() {
    let (store, id) = store_with_article("Export growth continues");
    let scorer = Arc::new(CannedScorer::new(0.73));
    let extractor = CannedExtractor {
        body: Some("First paragraph.\n\n\nSecond paragraph.".to_string()),
    };

    let processed = pipeline(Arc::clone(&store), extractor, Arc::clone(&scorer))
        .run()
        .await
        .unwrap();
    assert_eq!(processed, 1);

    let articles = store.articles();
    let stored = articles.iter().find(|a| a.id == id).unwrap();
    assert!(stored.is_text_parsed);
    // Paragraph breaks collapse to spaces in the stored text.
    assert_eq!(
        stored.text.as_deref(),
        Some("First paragraph. Second paragraph.")
    );
    assert_eq!(stored.sentiment, Some(0.73));

    // The scorer saw title and body, with dates and punctuation gone.
    let inputs = scorer.inputs.lock().unwrap();
    assert_eq!(inputs.len(), 1);
    assert!(inputs[0].contains("Export growth continues"));
    assert!(inputs[0].contains("First paragraph"));
}

#[tokio::test]
async fn unextractable_article_stays_unparsed() {
    let (store, id) = store_with_article("Export growth continues");
    let scorer = Arc::new(CannedScorer::new(0.5));
    let extractor = CannedExtractor { body: None };

    let processed = pipeline(Arc::clone(&store), extractor, Arc::clone(&scorer))
        .run()
        .await
        .unwrap();
    assert_eq!(processed, 0);

    let articles = store.articles();
    let stored = articles.iter().find(|a| a.id == id).unwrap();
    assert!(!stored.is_text_parsed);
    assert!(scorer.inputs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn consent_wall_is_left_for_the_next_pass() {
    let (store, id) = store_with_article("Export growth continues");
    let scorer = Arc::new(CannedScorer::new(0.5));
    let extractor = CannedExtractor {
        body: Some("Access Denied\nYou don't have permission.".to_string()),
    };

    let processed = pipeline(Arc::clone(&store), extractor, Arc::clone(&scorer))
        .run()
        .await
        .unwrap();
    assert_eq!(processed, 0);

    let articles = store.articles();
    assert!(!articles.iter().find(|a| a.id == id).unwrap().is_text_parsed);
}

#[tokio::test]
async fn parsed_articles_are_not_revisited() {
    let (store, _id) = store_with_article("Export growth continues");
    let scorer = Arc::new(CannedScorer::new(0.9));
    let extractor = CannedExtractor {
        body: Some("Body text.".to_string()),
    };

    let pipe = pipeline(Arc::clone(&store), extractor, Arc::clone(&scorer));
    assert_eq!(pipe.run().await.unwrap(), 1);
    // The second pass finds nothing to do.
    assert_eq!(pipe.run().await.unwrap(), 0);
    assert_eq!(scorer.inputs.lock().unwrap().len(), 1);
}
