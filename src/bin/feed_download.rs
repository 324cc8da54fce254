use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use newsfeedner::fetcher::PageFetcher;
use newsfeedner::filter::StopWordFilter;
use newsfeedner::ingest::FeedDownloader;
use newsfeedner::store::{PgStore, Store};
use newsfeedner::Config;

/// Periodically pull every configured feed and gate new items into the
/// article table.
#[derive(Parser, Debug)]
#[command(name = "feed-download")]
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

    let downloader = FeedDownloader::new(
        Arc::clone(&store) as Arc<dyn Store>,
        PageFetcher::new()?,
        Arc::new(StopWordFilter::new()),
        config.delta_date_article,
    );

    loop {
        match downloader.run().await {
            Ok(summary) => info!(
                feeds = summary.feeds_searched,
                added = summary.added,
                excluded = summary.excluded,
                "pass complete"
            ),
            Err(e) => error!(error = %e, "download pass failed"),
        }

        if args.once {
            break;
        }
        info!(minutes = config.article_sleep.as_secs() / 60, "sleeping");
        tokio::time::sleep(config.article_sleep).await;
    }

    Ok(())
}
