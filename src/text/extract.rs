//! Full-text extraction. A handful of sources need a bespoke scrape
//! (API endpoints, JSON blobs, odd markup); everything else goes through
//! the generic paragraph extractor.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use scraper::{Html, Selector};
use tracing::warn;

use crate::fetcher::{FetchOptions, PageFetcher};
use crate::sources::country_code;

/// Article language hint, from the feed's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Ru,
    En,
}

impl Lang {
    pub fn from_tags(tags: &str) -> Self {
        if tags.contains("ru") {
            Lang::Ru
        } else {
            Lang::En
        }
    }
}

#[async_trait]
pub trait ExtractText: Send + Sync {
    /// Best-effort article body. `None` means the page could not be
    /// fetched or carried no text; the article stays unparsed.
    async fn extract(
        &self,
        fetcher: &PageFetcher,
        feed_name: &str,
        url: &str,
        lang: Lang,
    ) -> Option<String>;
}

fn sel(selector: &str) -> Selector {
    Selector::parse(selector).expect("valid selector literal")
}

/// Paragraph-oriented plain text: `<p>` contents joined with blank
/// lines, falling back to the whole document's text when the page (or
/// fragment) has no paragraph markup.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let p_sel = sel("p");

    let paragraphs: Vec<String> = document
        .select(&p_sel)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    if !paragraphs.is_empty() {
        return paragraphs.join("\n\n");
    }

    document
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

/// Text of the first element matching `selector`.
fn text_of(html: &str, selector: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let target = sel(selector);
    document
        .select(&target)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn extract_mofa_japan(html: &str) -> Option<String> {
    let body = text_of(html, "div#maincontents")?;
    // The page tail is navigation.
    Some(match body.rsplit_once("Related Links") {
        Some((head, _)) => head.trim().to_string(),
        None => body,
    })
}

fn extract_scmp(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let script_sel = sel("script[type=\"application/ld+json\"]");
    for script in document.select(&script_sel) {
        let raw = script.text().collect::<String>();
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) {
            if let Some(body) = value.get("articleBody").and_then(|b| b.as_str()) {
                return Some(body.to_string());
            }
        }
    }
    None
}

fn extract_vedomosti(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let body_sel = sel("div.article__body");
    let para_sel = sel("p.box-paragraph__text");

    let body = document.select(&body_sel).next()?;
    let paragraphs: Vec<String> = body
        .select(&para_sel)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|p| !p.is_empty() && !p.starts_with("Подписывайтесь"))
        .collect();

    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n"))
    }
}

fn extract_cgtn(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let main_sel = sel("div#cmsMainContent");
    let data_json = document
        .select(&main_sel)
        .next()?
        .value()
        .attr("data-json")?;

    let blocks: serde_json::Value = serde_json::from_str(data_json).ok()?;
    let parts: Vec<&str> = blocks
        .as_array()?
        .iter()
        .filter_map(|b| b.get("content").and_then(|c| c.as_str()))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(html_to_text(&parts.join(" ")))
    }
}

/// Rewrite an argusmedia.com article URL into its JSON API form.
fn argus_api_url(url: &str) -> String {
    static ARTICLE_ID: once_cell::sync::Lazy<regex::Regex> =
        once_cell::sync::Lazy::new(|| regex::Regex::new(r"(\d{7})-").expect("regex"));
    let api = url.replace("/ru/", "/api/");
    ARTICLE_ID.replace(&api, "$1/").into_owned()
}

pub struct ScraperExtractor;

impl ScraperExtractor {
    pub fn new() -> Self {
        Self
    }

    async fn page(&self, fetcher: &PageFetcher, url: &str) -> Option<String> {
        fetcher.get_text(url, FetchOptions::default()).await
    }

    /// minpromtorg articles are only readable through the ministry's
    /// own RSS, where the summary carries the full body.
    async fn extract_minpromtorg(&self, fetcher: &PageFetcher, url: &str) -> Option<String> {
        let rss = fetcher
            .get_text(
                "https://minpromtorg.gov.ru/api/ssp-news/v1/rss",
                FetchOptions::default(),
            )
            .await?;
        let feed = parser::parse(rss.as_bytes()).ok()?;
        let entry = feed
            .entries
            .into_iter()
            .find(|e| e.links.iter().any(|l| l.href == url))?;
        entry.summary.map(|s| html_to_text(&s.content))
    }

    async fn extract_torg_pred(&self, fetcher: &PageFetcher, url: &str) -> Option<String> {
        let code = country_code(url)?;
        let api_url = format!(
            "https://{code}.minpromtorg.gov.ru/api/ssp-news/v1/?isCurrentSiteOnly=true&per_page=10&page=1"
        );
        let json = fetcher.get_json(&api_url, FetchOptions::insecure()).await?;

        let wanted_id = url.rsplit("?id=").next()?;
        let body = json.get("data")?.as_array()?.iter().find_map(|item| {
            let id = item.get("id")?;
            let matches = match id.as_i64() {
                Some(n) => n.to_string() == wanted_id,
                None => id.as_str() == Some(wanted_id),
            };
            if matches {
                item.get("text")?.as_str().map(str::to_string)
            } else {
                None
            }
        })?;
        Some(html_to_text(&body))
    }

    async fn extract_argus(&self, fetcher: &PageFetcher, url: &str) -> Option<String> {
        let api_url = argus_api_url(url);
        let opts = FetchOptions::default().with_timeout(Duration::from_secs(10));
        let json = fetcher.get_json(&api_url, opts).await?;
        json.get("Body")
            .and_then(|b| b.as_str())
            .map(html_to_text)
    }
}

impl Default for ScraperExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractText for ScraperExtractor {
    async fn extract(
        &self,
        fetcher: &PageFetcher,
        feed_name: &str,
        url: &str,
        _lang: Lang,
    ) -> Option<String> {
        let text = match feed_name {
            "minpromtorg" => self.extract_minpromtorg(fetcher, url).await,
            "argus" => self.extract_argus(fetcher, url).await,
            "mid" => text_of(&self.page(fetcher, url).await?, "div.page-inner"),
            "mofa_japan" => extract_mofa_japan(&self.page(fetcher, url).await?),
            "scmp" => extract_scmp(&self.page(fetcher, url).await?),
            "exportcenter" => text_of(&self.page(fetcher, url).await?, "div.article__body"),
            "vedomosti" => extract_vedomosti(&self.page(fetcher, url).await?),
            "metalbulletin" => text_of(&self.page(fetcher, url).await?, "div.text1"),
            "ngv" => text_of(&self.page(fetcher, url).await?, "div.project__wraper"),
            "cdu" => text_of(&self.page(fetcher, url).await?, "div.article"),
            name if name.starts_with("torg_pred_") => {
                self.extract_torg_pred(fetcher, url).await
            }
            name if name.starts_with("cgtn_") => extract_cgtn(&self.page(fetcher, url).await?),
            _ => {
                let opts = FetchOptions::default().with_timeout(Duration::from_secs(10));
                fetcher
                    .get_text(url, opts)
                    .await
                    .map(|body| html_to_text(&body))
            }
        };

        match text {
            Some(t) if !t.is_empty() => Some(t),
            _ => {
                warn!(feed = %feed_name, %url, "no article text extracted");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_hint_comes_from_tags() {
        assert_eq!(Lang::from_tags("news ru gov"), Lang::Ru);
        assert_eq!(Lang::from_tags("business en"), Lang::En);
    }

    #[test]
    fn html_to_text_prefers_paragraphs() {
        let html = "<html><body><nav>menu</nav>\
                    <p>First paragraph.</p><p>Second one.</p></body></html>";
        assert_eq!(html_to_text(html), "First paragraph.\n\nSecond one.");
    }

    #[test]
    fn html_to_text_falls_back_to_full_text() {
        assert_eq!(html_to_text("<html>just plain text</html>"), "just plain text");
    }

    #[test]
    fn mofa_text_is_cut_at_related_links() {
        let html = r#"<div id="maincontents">Press conference text here.
        Related Links link1 link2</div>"#;
        assert_eq!(
            extract_mofa_japan(html).as_deref(),
            Some("Press conference text here.")
        );
    }

    #[test]
    fn scmp_body_comes_from_ld_json() {
        let html = r#"<html><head>
          <script type="application/ld+json">{"headline":"x","articleBody":"Body text."}</script>
        </head></html>"#;
        assert_eq!(extract_scmp(html).as_deref(), Some("Body text."));
        assert_eq!(extract_scmp("<html></html>"), None);
    }

    #[test]
    fn vedomosti_skips_subscription_footer() {
        let html = r#"<div class="article__body">
          <p class="box-paragraph__text">Первый абзац.</p>
          <p class="box-paragraph__text">Подписывайтесь на наш канал.</p>
          <p class="box-paragraph__text">Второй абзац.</p>
        </div>"#;
        assert_eq!(
            extract_vedomosti(html).as_deref(),
            Some("Первый абзац.\nВторой абзац.")
        );
    }

    #[test]
    fn cgtn_blocks_come_from_data_json() {
        let html = r#"<div id="cmsMainContent"
            data-json='[{"content":"<p>First.</p>"},{"type":"image"},{"content":"<p>Second.</p>"}]'>
        </div>"#;
        assert_eq!(extract_cgtn(html).as_deref(), Some("First.\n\nSecond."));
    }

    #[test]
    fn argus_urls_map_to_the_api() {
        assert_eq!(
            argus_api_url("https://www.argusmedia.com/ru/news/2430001-some-title"),
            "https://www.argusmedia.com/api/news/2430001/some-title"
        );
    }
}
