//! News ingestion pipeline: per-source feed normalization, a dedup and
//! date-window gate in front of Postgres, and a second pass that pulls
//! article bodies and sentiment scores.
//!
//! Two binaries drive the crate: `feed-download` runs the ingestion
//! pass, `text-update` runs the extraction pass. Both loop on a
//! configured interval unless started with `--once`.

pub mod config;
pub mod dates;
pub mod fetcher;
pub mod filter;
pub mod ingest;
pub mod sentiment;
pub mod sources;
pub mod store;
pub mod text;
pub mod textpipe;
pub mod types;

pub use config::Config;
pub use fetcher::{FetchOptions, PageFetcher};
pub use filter::{StopWordFilter, TitleFilter};
pub use ingest::{DropReason, FeedDownloader, GateDecision, IngestionGate, RunSummary};
pub use sentiment::{HttpSentimentScorer, SentimentScorer};
pub use store::{PgStore, Store};
pub use textpipe::TextPipeline;
pub use types::{Feed, FeedItem, NormalizedFeed, PipelineError, Result};
