use std::sync::Arc;

use async_trait::async_trait;
use ns_core::{
    ArticleFeed, ArticleItem, CategoryItem, CategoryListing, Error, ExtractionContext,
    ExtractionResult, IdentityGenerator, Result,
};
use reqwest::header::HeaderMap;

use super::utils::{self, absolutize, attr, element_text, first_match, parse_selector};
use crate::fetch::{default_headers, Fetcher};
use crate::scrapers::{Scraper, SourceMetadata};

const NAV_LINK: &str = "ul > li > a[data-testid='Body']";
const CARD: &str = "li[data-testid='FeedListItem']";
const TITLE: &str = "div[data-testid='Title']";
const TITLE_LINK: &str = "a[data-testid='TitleLink']";
const IMAGE: &str = "img[src]";
const KICKER: &str = "span[data-testid='KickerLabel']";
const DATELINE: &str = "time[data-testid='DateLineText']";

/// Reuters section pages: category links in the section nav, articles in
/// `FeedListItem` cards.
#[derive(Clone)]
pub struct ReutersScraper {
    fetcher: Arc<dyn Fetcher>,
    headers: HeaderMap,
    ids: IdentityGenerator,
}

impl ReutersScraper {
    const BASE_URL: &'static str = "https://www.reuters.com";
    const NAME: &'static str = "reuters";

    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_name(fetcher, Self::NAME)
    }

    /// Same markup rules, registered under another name.
    pub fn with_name(fetcher: Arc<dyn Fetcher>, name: &str) -> Self {
        Self {
            fetcher,
            headers: default_headers(),
            ids: IdentityGenerator::new(name, Self::BASE_URL),
        }
    }

    pub fn extract_categories(&self, html: &str, page: &str) -> Result<CategoryListing> {
        let url = utils::page_url(Self::BASE_URL, &[page]);
        let document = utils::parse_document(&self.source_metadata(), &url, html)?;
        let nav_link = parse_selector(NAV_LINK)?;

        let items = document
            .select(&nav_link)
            .filter_map(|link| {
                let href = link.value().attr("href")?;
                // The first segment is the section itself ("/world/africa/").
                let subsection = utils::path_segments(href).into_iter().skip(1).last().unwrap_or("");
                let name = if subsection.is_empty() { page } else { subsection };
                Some(CategoryItem {
                    id: self.ids.category_id(page, name),
                    name: Some(name.to_string()),
                    description: element_text(link),
                    query: Some(utils::category_query(page, subsection)),
                })
            })
            .collect();

        Ok(ExtractionResult::new(ExtractionContext::for_page(page), items))
    }

    pub fn extract_articles(
        &self,
        html: &str,
        page: &str,
        category: &str,
        subcategory: &str,
    ) -> Result<ArticleFeed> {
        let url = utils::page_url(Self::BASE_URL, &[page, category, subcategory]);
        let document = utils::parse_document(&self.source_metadata(), &url, html)?;
        let card = parse_selector(CARD)?;
        let title = parse_selector(TITLE)?;
        let title_link = parse_selector(TITLE_LINK)?;
        let image = parse_selector(IMAGE)?;
        let kicker = parse_selector(KICKER)?;
        let dateline = parse_selector(DATELINE)?;

        let requested_subcategory = (!subcategory.is_empty()).then(|| subcategory.to_string());

        let items = document
            .select(&card)
            .enumerate()
            .map(|(i, card)| {
                // The anchor lives inside the title block, so no title means no link.
                let heading = first_match(card, &title);
                let link = heading
                    .and_then(|h| first_match(h, &title_link))
                    .and_then(|a| attr(a, "href"))
                    .and_then(|href| absolutize(Self::BASE_URL, &href));

                ArticleItem {
                    id: self.ids.card_id(link.as_deref(), i + 1),
                    category: first_match(card, &kicker)
                        .and_then(element_text)
                        .map(|label| strip_category_word(&label))
                        .filter(|label| !label.is_empty()),
                    subcategory: requested_subcategory.clone(),
                    title: heading.and_then(element_text),
                    link,
                    image: first_match(card, &image).and_then(|img| attr(img, "src")),
                    datetime: first_match(card, &dateline).and_then(|t| attr(t, "datetime")),
                }
            })
            .collect();

        Ok(ExtractionResult::new(
            ExtractionContext::for_feed(Self::BASE_URL, page, category, subcategory),
            items,
        ))
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let meta = self.source_metadata();
        let logger = utils::source_logger(&meta);
        logger.debug(&format!("Fetching {}", url));
        self.fetcher.fetch(url, &self.headers).await.map_err(|e| {
            logger.error(&format!("Fetch failed for {}: {}", url, e));
            Error::extraction(&meta.name, url, e)
        })
    }
}

/// Kicker labels carry a screen-reader "category" suffix, e.g. "Africacategory".
fn strip_category_word(label: &str) -> String {
    label.replace("category", "").trim().to_string()
}

#[async_trait]
impl Scraper for ReutersScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: self.ids.source_name().to_string(),
            base_url: Self::BASE_URL,
            emoji: "📰",
        }
    }

    async fn list_categories(&self, page: &str) -> Result<CategoryListing> {
        let url = utils::page_url(Self::BASE_URL, &[page]);
        let html = self.fetch(&url).await?;
        let listing = self.extract_categories(&html, page)?;
        utils::source_logger(&self.source_metadata())
            .info(&format!("Found {} categories on {}", listing.total(), url));
        Ok(listing)
    }

    async fn list_articles(&self, page: &str, category: &str, subcategory: &str) -> Result<ArticleFeed> {
        let url = utils::page_url(Self::BASE_URL, &[page, category, subcategory]);
        let html = self.fetch(&url).await?;
        let feed = self.extract_articles(&html, page, category, subcategory)?;
        utils::source_logger(&self.source_metadata())
            .info(&format!("Found {} articles on {}", feed.total(), url));
        Ok(feed)
    }
}
