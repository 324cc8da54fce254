//! The text-update pass: fetch bodies for unparsed articles, score them,
//! and mark them parsed.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::dates::window_bound;
use crate::fetcher::PageFetcher;
use crate::sentiment::SentimentScorer;
use crate::store::Store;
use crate::text::{collapse_newlines, preprocess_text, starts_with_block_marker};
use crate::text::{ExtractText, Lang};
use crate::types::{PendingArticle, Result};

/// Pause between articles so no single site sees a request burst.
const THROTTLE: Duration = Duration::from_millis(300);

pub struct TextPipeline {
    store: Arc<dyn Store>,
    fetcher: PageFetcher,
    extractor: Arc<dyn ExtractText>,
    scorer: Arc<dyn SentimentScorer>,
    delta_days: i64,
    throttle: Duration,
}

impl TextPipeline {
    pub fn new(
        store: Arc<dyn Store>,
        fetcher: PageFetcher,
        extractor: Arc<dyn ExtractText>,
        scorer: Arc<dyn SentimentScorer>,
        delta_days: i64,
    ) -> Self {
        Self {
            store,
            fetcher,
            extractor,
            scorer,
            delta_days,
            throttle: THROTTLE,
        }
    }

    /// One pass over the backlog. Articles are visited in random order
    /// so a persistently failing site cannot starve the rest.
    pub async fn run(&self) -> Result<usize> {
        let start = window_bound(-self.delta_days);
        let end = window_bound(1);

        let mut pending = self.store.unparsed_articles(start, end).await?;
        pending.shuffle(&mut rand::rng());
        info!(articles = pending.len(), "text pass starting");

        let mut processed = 0usize;
        for article in &pending {
            match self.process(article).await {
                Ok(true) => {
                    processed += 1;
                    tokio::time::sleep(self.throttle).await;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(article = article.id, url = %article.url, error = %e, "text update failed");
                }
            }
        }

        info!(processed, "text pass finished");
        Ok(processed)
    }

    /// Returns true when the article was scored and marked parsed,
    /// false when it was skipped for a later retry.
    async fn process(&self, article: &PendingArticle) -> Result<bool> {
        let lang = Lang::from_tags(&article.feed_tags);
        info!(
            feed = article.feed_id,
            date = %article.published_parsed.date_naive(),
            url = %article.url,
            title = %article.title,
            "extracting article"
        );

        let Some(raw) = self
            .extractor
            .extract(&self.fetcher, &article.feed_name, &article.url, lang)
            .await
        else {
            return Ok(false);
        };

        let text = collapse_newlines(&raw);
        if text.is_empty() || starts_with_block_marker(&text) {
            return Ok(false);
        }

        let scorer_input = preprocess_text(&format!("{}\n\n{}", article.title, text));
        let sentiment = self.scorer.score(&scorer_input).await?;

        self.store.mark_parsed(article.id, &text, sentiment).await?;
        Ok(true)
    }
}
