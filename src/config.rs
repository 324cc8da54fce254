use std::env;
use std::time::Duration;

use crate::types::{PipelineError, Result};

/// Environment-sourced settings shared by both binaries.
///
/// `DATABASE_URL` wins when set; otherwise the URL is assembled from the
/// individual `POSTGRES_*` variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Trailing ingestion window for new articles, in days.
    pub delta_date_article: i64,
    /// Trailing window for text extraction, in days.
    pub delta_date_text: i64,
    /// Pause between feed-download passes.
    pub article_sleep: Duration,
    /// Pause between text-update passes.
    pub text_sleep: Duration,
    /// Sentiment-scoring endpoint, POST {"text": ...}.
    pub sentiment_server: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => format!(
                "postgresql://{}:{}@{}:{}/{}",
                require("POSTGRES_USER")?,
                require("POSTGRES_PASSWORD")?,
                require("POSTGRES_HOST")?,
                require("POSTGRES_PORT")?,
                require("POSTGRES_DB")?,
            ),
        };

        Ok(Self {
            database_url,
            delta_date_article: int_var("DELTA_DATE_ARTICLE")?,
            delta_date_text: int_var("DELTA_DATE_TEXT")?,
            article_sleep: Duration::from_secs(int_var("DOWNLOAD_ARTICLE_SLEEP")? as u64 * 60),
            text_sleep: Duration::from_secs(int_var("DOWNLOAD_TEXT_SLEEP")? as u64 * 60),
            sentiment_server: require("SENTIMENT_SERVER")?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name).map_err(|_| PipelineError::Config(format!("{name} is not set")))
}

fn int_var(name: &str) -> Result<i64> {
    require(name)?
        .parse()
        .map_err(|_| PipelineError::Config(format!("{name} is not an integer")))
}
