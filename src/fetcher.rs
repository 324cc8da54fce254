use std::time::Duration;

use encoding_rs::WINDOWS_1251;
use rand::seq::IndexedRandom;
use reqwest::{Client, Method};
use tracing::{debug, warn};

use crate::types::Result;

/// Pool of plausible desktop user agents; each request picks one at
/// random, mirroring how the sources are normally browsed.
static USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:126.0) Gecko/20100101 Firefox/126.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Per-request knobs each source adapter picks for itself.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub timeout: Duration,
    /// Several government sites serve broken certificate chains.
    pub verify_tls: bool,
    pub method: Method2,
}

/// The only two verbs the sources need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method2 {
    Get,
    Post,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            verify_tls: true,
            method: Method2::Get,
        }
    }
}

impl FetchOptions {
    pub fn insecure() -> Self {
        Self {
            verify_tls: false,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn post() -> Self {
        Self {
            method: Method2::Post,
            ..Self::default()
        }
    }
}

/// A fetched page after redirects, decoded to UTF-8.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: String,
    pub body: String,
}

/// Blocking point for all outbound page fetches. Failures are soft: any
/// network error, non-200 status, or undecodable body yields `None` so
/// adapters can emit an empty result instead of propagating.
pub struct PageFetcher {
    verified: Client,
    unverified: Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self> {
        let verified = Client::builder()
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;
        let unverified = Client::builder()
            .danger_accept_invalid_certs(true)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;
        Ok(Self {
            verified,
            unverified,
        })
    }

    fn client(&self, opts: &FetchOptions) -> &Client {
        if opts.verify_tls {
            &self.verified
        } else {
            &self.unverified
        }
    }

    /// Fetch a page body. UTF-8 with a CP1251 fallback for the handful of
    /// Russian sources that still serve it.
    pub async fn get_page(&self, url: &str, opts: FetchOptions) -> Option<FetchedPage> {
        let method = match opts.method {
            Method2::Get => Method::GET,
            Method2::Post => Method::POST,
        };
        let response = self
            .client(&opts)
            .request(method, url)
            .header("User-Agent", random_user_agent())
            .timeout(opts.timeout)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!(%url, error = %e, "fetch failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "fetch returned non-success status");
            return None;
        }

        let final_url = response.url().to_string();
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                warn!(%url, error = %e, "failed to read response body");
                return None;
            }
        };

        let body = match std::str::from_utf8(&bytes) {
            Ok(s) => s.to_string(),
            Err(_) => {
                debug!(%url, "body is not UTF-8, decoding as CP1251");
                let (decoded, _, _) = WINDOWS_1251.decode(&bytes);
                decoded.into_owned()
            }
        };

        Some(FetchedPage { final_url, body })
    }

    /// Convenience wrapper returning just the body.
    pub async fn get_text(&self, url: &str, opts: FetchOptions) -> Option<String> {
        self.get_page(url, opts).await.map(|p| p.body)
    }

    pub async fn get_json(&self, url: &str, opts: FetchOptions) -> Option<serde_json::Value> {
        let page = self.get_page(url, opts).await?;
        match serde_json::from_str(&page.body) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(%url, error = %e, "response is not valid JSON");
                None
            }
        }
    }
}
