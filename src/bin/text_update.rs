use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use newsfeedner::fetcher::PageFetcher;
use newsfeedner::sentiment::HttpSentimentScorer;
use newsfeedner::store::{PgStore, Store};
use newsfeedner::text::ScraperExtractor;
use newsfeedner::Config;
use newsfeedner::TextPipeline;

/// Periodically fetch article bodies for unparsed rows and attach
/// sentiment scores.
#[derive(Parser, Debug)]
#[command(name = "text-update")]
struct Args {
    /// Run a single pass and exit instead of looping.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let store = Arc::new(PgStore::connect(&config.database_url).await?);
    store.run_migrations().await?;

    let pipeline = TextPipeline::new(
        Arc::clone(&store) as Arc<dyn Store>,
        PageFetcher::new()?,
        Arc::new(ScraperExtractor::new()),
        Arc::new(HttpSentimentScorer::new(&config.sentiment_server)?),
        config.delta_date_text,
    );

    loop {
        match pipeline.run().await {
            Ok(processed) => info!(processed, "pass complete"),
            Err(e) => error!(error = %e, "text pass failed"),
        }

        if args.once {
            break;
        }
        info!(minutes = config.text_sleep.as_secs() / 60, "sleeping");
        tokio::time::sleep(config.text_sleep).await;
    }

    Ok(())
}
