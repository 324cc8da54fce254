//! Per-source feed adapters.
//!
//! Each adapter turns one site's listing page (or RSS feed) into a
//! [`NormalizedFeed`]. Adapters never fail: an unreachable source or a
//! layout change produces an empty entry list, and the run moves on to
//! the next feed.

mod ahram;
mod apnews;
mod cgtn;
mod gov_ru;
mod japan_news;
mod metalbulletin;
mod mofa_japan;
mod montsame;
mod reuters;
mod rss;
mod torg_pred;
mod treasury;
mod xinhua;

use std::sync::Arc;

use async_trait::async_trait;
use scraper::Selector;
use url::Url;

use crate::fetcher::PageFetcher;
use crate::types::NormalizedFeed;

pub use ahram::AhramAdapter;
pub use apnews::ApNewsAdapter;
pub use cgtn::CgtnAdapter;
pub use gov_ru::{EaeunionAdapter, MinEconDevelAdapter, MinTransAdapter};
pub use japan_news::JapanNewsAdapter;
pub use metalbulletin::MetalBulletinAdapter;
pub use mofa_japan::MofaJapanAdapter;
pub use montsame::MontsameAdapter;
pub use reuters::ReutersAdapter;
pub use rss::RssAdapter;
pub use torg_pred::{country_code, TorgPredAdapter};
pub use treasury::TreasuryAdapter;
pub use xinhua::XinhuaAdapter;

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Fetch and normalize one source. Infallible by contract; failures
    /// surface as an empty [`NormalizedFeed`].
    async fn parse(&self, fetcher: &PageFetcher, feed_url: &str) -> NormalizedFeed;
}

/// Resolve a feed's configured adapter name. `None` for unknown names;
/// the name "no parser" never reaches here because the feed query
/// filters it out.
pub fn adapter_by_name(name: &str) -> Option<Arc<dyn SourceAdapter>> {
    let adapter: Arc<dyn SourceAdapter> = match name {
        "CommonParser" => Arc::new(RssAdapter::common()),
        "MIDParser" => Arc::new(RssAdapter::mid()),
        "MontsameParser" => Arc::new(MontsameAdapter::new()),
        "TorgPredParser" => Arc::new(TorgPredAdapter::new()),
        "ReutersParser" => Arc::new(ReutersAdapter::new()),
        "XinhuaParser" => Arc::new(XinhuaAdapter::new()),
        "USDepartmentOfTreasuryParser" => Arc::new(TreasuryAdapter::new()),
        "APNewsParser" => Arc::new(ApNewsAdapter::new()),
        "JapanNewsParser" => Arc::new(JapanNewsAdapter::new()),
        "CGTNParser" => Arc::new(CgtnAdapter::new()),
        "MetalBulletinParser" => Arc::new(MetalBulletinAdapter::new()),
        "MOFAJapanParser" => Arc::new(MofaJapanAdapter::new()),
        "MinEconDevelParser" => Arc::new(MinEconDevelAdapter::new()),
        "MinTransParser" => Arc::new(MinTransAdapter::new()),
        "EaeunionParser" => Arc::new(EaeunionAdapter::new()),
        "AhramParser" => Arc::new(AhramAdapter::new()),
        _ => return None,
    };
    Some(adapter)
}

/// Static CSS selector. Selector strings in this module are literals
/// checked by the adapter tests.
pub(crate) fn sel(selector: &str) -> Selector {
    Selector::parse(selector).expect("valid selector literal")
}

/// `urljoin` equivalent: absolute hrefs pass through, relative ones are
/// resolved against the base.
pub(crate) fn join_url(base: &str, href: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Source-local id derived from a relative URL, slashes flattened.
pub(crate) fn id_from_path(path: &str) -> String {
    path.replace('/', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_every_configured_adapter() {
        for name in [
            "CommonParser",
            "MIDParser",
            "MontsameParser",
            "TorgPredParser",
            "ReutersParser",
            "XinhuaParser",
            "USDepartmentOfTreasuryParser",
            "APNewsParser",
            "JapanNewsParser",
            "CGTNParser",
            "MetalBulletinParser",
            "MOFAJapanParser",
            "MinEconDevelParser",
            "MinTransParser",
            "EaeunionParser",
            "AhramParser",
        ] {
            assert!(adapter_by_name(name).is_some(), "missing adapter: {name}");
        }
        assert!(adapter_by_name("no parser").is_none());
        assert!(adapter_by_name("SomethingElse").is_none());
    }

    #[test]
    fn join_url_resolves_relative_and_keeps_absolute() {
        assert_eq!(
            join_url("https://montsame.mn/ru/", "/ru/read/12345"),
            "https://montsame.mn/ru/read/12345"
        );
        assert_eq!(
            join_url("https://example.com/base", "https://other.org/x"),
            "https://other.org/x"
        );
    }

    #[test]
    fn id_from_path_flattens_slashes() {
        assert_eq!(id_from_path("/ru/read/12345"), "_ru_read_12345");
    }
}
