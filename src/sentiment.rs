//! Client for the external sentiment-scoring service.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use crate::types::{PipelineError, Result};

/// The response key holding the score. The service returns several
/// model outputs; this is the one the pipeline stores.
const SCORE_KEY: &str = "score 2";

#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<f64>;
}

pub struct HttpSentimentScorer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSentimentScorer {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SentimentScorer for HttpSentimentScorer {
    async fn score(&self, text: &str) -> Result<f64> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Scorer(format!(
                "scorer returned status {status}"
            )));
        }

        let body: serde_json::Value = response.json().await?;
        body.get(SCORE_KEY)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| {
                PipelineError::Scorer(format!("response is missing \"{SCORE_KEY}\""))
            })
    }
}
