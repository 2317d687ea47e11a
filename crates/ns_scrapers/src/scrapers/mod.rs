use async_trait::async_trait;
use ns_core::{ArticleFeed, CategoryListing, Result};

pub mod bbc;
pub mod reuters;

pub use bbc::BbcScraper;
pub use reuters::ReutersScraper;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetadata {
    /// Name the scraper was registered under; scopes positional IDs.
    pub name: String,
    /// Origin URL the source publishes from; mixed into every ID it produces.
    pub base_url: &'static str,
    pub emoji: &'static str,
}

#[async_trait]
pub trait Scraper: Send + Sync {
    fn source_metadata(&self) -> SourceMetadata;

    /// Lists the sections linked from a listing page.
    async fn list_categories(&self, page: &str) -> Result<CategoryListing>;

    /// Lists the article cards on a feed page. Empty `category` or
    /// `subcategory` are left out of the fetched URL.
    async fn list_articles(&self, page: &str, category: &str, subcategory: &str) -> Result<ArticleFeed>;
}

pub type BoxedScraper = Box<dyn Scraper>;

/// Common utilities for scrapers
pub(crate) mod utils {
    use ns_core::{Error, Result};
    use scraper::{ElementRef, Html, Selector};
    use url::Url;

    use crate::logging::Logger;
    use super::SourceMetadata;

    pub fn parse_selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector).map_err(|e| Error::selector(selector, format!("{:?}", e)))
    }

    /// Parses a fetched body, treating a blank one as a failed extraction.
    pub fn parse_document(meta: &SourceMetadata, url: &str, html: &str) -> Result<Html> {
        if html.trim().is_empty() {
            return Err(Error::extraction(&meta.name, url, "empty document"));
        }
        Ok(Html::parse_document(html))
    }

    /// Trimmed text of an element, `None` when blank.
    pub fn element_text(element: ElementRef<'_>) -> Option<String> {
        let text = element.text().collect::<String>();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    pub fn first_match<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
        scope.select(selector).next()
    }

    pub fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
        element
            .value()
            .attr(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Resolves `href` against the source's origin, leaving absolute URLs untouched.
    pub fn absolutize(base_url: &str, href: &str) -> Option<String> {
        if href.starts_with("http://") || href.starts_with("https://") {
            return Some(href.to_string());
        }
        let base = Url::parse(base_url).ok()?;
        base.join(href).ok().map(|u| u.to_string())
    }

    /// Non-empty path segments of an href, ignoring any query or fragment.
    pub fn path_segments(href: &str) -> Vec<&str> {
        let path = href.split(['?', '#']).next().unwrap_or_default();
        let path = match path.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or_default(),
            None => path,
        };
        path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// `{base}/{segment}/...`, skipping empty segments.
    pub fn page_url(base_url: &str, segments: &[&str]) -> String {
        let mut url = base_url.trim_end_matches('/').to_string();
        for segment in segments.iter().map(|s| s.trim_matches('/')).filter(|s| !s.is_empty()) {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    pub fn category_query(page: &str, category: &str) -> String {
        format!("?page={}&category={}", page, category)
    }

    pub fn source_logger(meta: &SourceMetadata) -> Logger {
        Logger::new()
            .with_prefix(meta.emoji.to_string())
            .with_prefix(format!("[{}]", meta.name))
    }
}
