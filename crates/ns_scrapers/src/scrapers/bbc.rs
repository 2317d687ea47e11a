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

const NAV_LINK: &str = "a[data-testid='subNavigationLink']";
const CARD: &str = "[data-testid='liverpool-card']";
const HEADLINE: &str = "h2";
const LINK: &str = "a[href]";
const IMAGE: &str = "[data-testid='card-media'] img";
const TAG: &str = "[data-testid='card-metadata-tag']";
const TIMESTAMP: &str = "time[datetime]";

#[derive(Clone)]
pub struct BbcScraper {
    fetcher: Arc<dyn Fetcher>,
    headers: HeaderMap,
    ids: IdentityGenerator,
}

impl BbcScraper {
    const BASE_URL: &'static str = "https://www.bbc.com";
    const NAME: &'static str = "bbc";

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
                let name = utils::path_segments(href).last().copied().unwrap_or(page);
                Some(CategoryItem {
                    id: self.ids.category_id(page, name),
                    name: Some(name.to_string()),
                    description: element_text(link),
                    query: Some(utils::category_query(page, name)),
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
        let headline = parse_selector(HEADLINE)?;
        let anchor = parse_selector(LINK)?;
        let image = parse_selector(IMAGE)?;
        let tag = parse_selector(TAG)?;
        let timestamp = parse_selector(TIMESTAMP)?;

        let requested_category = (!category.is_empty()).then(|| category.to_string());
        let requested_subcategory = (!subcategory.is_empty()).then(|| subcategory.to_string());

        let items = document
            .select(&card)
            .enumerate()
            .map(|(i, card)| {
                // Cards often wrap the whole block in the anchor, so the link
                // is resolved whether or not a headline is present.
                let link = first_match(card, &anchor)
                    .and_then(|a| attr(a, "href"))
                    .and_then(|href| absolutize(Self::BASE_URL, &href));

                ArticleItem {
                    id: self.ids.card_id(link.as_deref(), i + 1),
                    category: first_match(card, &tag)
                        .and_then(element_text)
                        .or_else(|| requested_category.clone()),
                    subcategory: requested_subcategory.clone(),
                    title: first_match(card, &headline).and_then(element_text),
                    link,
                    image: first_match(card, &image).and_then(|img| attr(img, "src")),
                    datetime: first_match(card, &timestamp).and_then(|t| attr(t, "datetime")),
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

#[async_trait]
impl Scraper for BbcScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: self.ids.source_name().to_string(),
            base_url: Self::BASE_URL,
            emoji: "📺",
        }
    }

    async fn list_categories(&self, page: &str) -> Result<CategoryListing> {
        let url = utils::page_url(Self::BASE_URL, &[page]);
        let html = self.fetch(&url).await?;
        let listing = self.extract_categories(&html, page)?;
        let logger = utils::source_logger(&self.source_metadata());
        if listing.total() == 0 {
            logger.warn(&format!("No navigation links on {}", url));
        } else {
            logger.info(&format!("Found {} categories on {}", listing.total(), url));
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    #[async_trait]
    impl Fetcher for Canned {
        async fn fetch(&self, _url: &str, _headers: &HeaderMap) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    const CARDS: &str = r#"
        <div data-testid="liverpool-card">
          <a href="/news/articles/c1">
            <div data-testid="card-media"><img src="https://ichef.bbci.co.uk/1.jpg"></div>
            <h2>First headline</h2>
          </a>
          <span data-testid="card-metadata-tag">Africa</span>
          <time datetime="2025-10-20T08:00:00.000Z">3 hrs ago</time>
        </div>
        <div data-testid="liverpool-card">
          <a href="https://www.bbc.com/news/articles/c2"><p>No headline here</p></a>
        </div>
    "#;

    #[test]
    fn test_extract_articles() {
        let scraper = BbcScraper::new(Arc::new(Canned("")));
        let feed = scraper.extract_articles(CARDS, "news", "world", "africa").unwrap();
        assert_eq!(feed.total(), 2);

        let first = &feed.items()[0];
        assert_eq!(first.title.as_deref(), Some("First headline"));
        assert_eq!(first.link.as_deref(), Some("https://www.bbc.com/news/articles/c1"));
        assert_eq!(first.image.as_deref(), Some("https://ichef.bbci.co.uk/1.jpg"));
        assert_eq!(first.category.as_deref(), Some("Africa"));
        assert_eq!(first.subcategory.as_deref(), Some("africa"));
        assert_eq!(first.datetime.as_deref(), Some("2025-10-20T08:00:00.000Z"));

        let second = &feed.items()[1];
        assert_eq!(second.title, None);
        assert_eq!(second.link.as_deref(), Some("https://www.bbc.com/news/articles/c2"));
        assert_eq!(second.category.as_deref(), Some("world"));
        assert_eq!(second.image, None);
        assert_ne!(second.id, "bbc_2");
    }

    #[test]
    fn test_relative_and_absolute_links_share_id() {
        let scraper = BbcScraper::new(Arc::new(Canned("")));
        let relative = r#"<div data-testid="liverpool-card"><a href="/news/x">x</a></div>"#;
        let absolute = r#"<div data-testid="liverpool-card"><a href="https://www.bbc.com/news/x">x</a></div>"#;
        let a = scraper.extract_articles(relative, "news", "", "").unwrap();
        let b = scraper.extract_articles(absolute, "news", "", "").unwrap();
        assert_eq!(a.items()[0].id, b.items()[0].id);
    }

    #[tokio::test]
    async fn test_list_categories_uses_last_segment() {
        let html = r#"
            <nav>
              <a data-testid="subNavigationLink" href="/news/world"> World </a>
              <a data-testid="subNavigationLink" href="/news/business/">Business</a>
              <a data-testid="subNavigationLink">No href</a>
            </nav>
        "#;
        let scraper = BbcScraper::new(Arc::new(Canned(html)));
        let listing = scraper.list_categories("news").await.unwrap();
        let names: Vec<_> = listing.items().iter().map(|c| c.name.as_deref().unwrap()).collect();
        assert_eq!(names, vec!["world", "business"]);
        assert_eq!(listing.items()[0].description.as_deref(), Some("World"));
        assert_eq!(listing.items()[1].query.as_deref(), Some("?page=news&category=business"));
    }

    #[tokio::test]
    async fn test_empty_body_is_extraction_error() {
        let scraper = BbcScraper::new(Arc::new(Canned("")));
        let err = scraper.list_articles("news", "world", "").await.unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }));
        assert!(err.to_string().contains("empty document"));
    }
}
