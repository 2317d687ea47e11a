//! Name → scraper factory lookup.
//!
//! The binary builds one registry at startup and shares it behind an
//! `Arc<RwLock<_>>`; request handling only resolves.

use std::sync::{Arc, RwLock};

use ns_core::{Error, Result};
use tracing::{debug, warn};
use url::Url;

use crate::fetch::Fetcher;
use crate::scrapers::{BbcScraper, BoxedScraper, ReutersScraper};

/// Builds a scraper for the name it was registered under.
pub type ScraperFactory = Arc<dyn Fn(&str) -> BoxedScraper + Send + Sync>;
pub type SharedRegistry = Arc<RwLock<ScraperRegistry>>;

#[derive(Clone, Default)]
pub struct ScraperRegistry {
    factories: Vec<(String, ScraperFactory)>,
}

impl ScraperRegistry {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Registry holding the built-in sources, all sharing `fetcher`.
    pub fn with_builtin(fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        let mut registry = Self::new();
        let reuters_fetcher = fetcher.clone();
        registry.register("reuters", move |name| {
            Box::new(ReutersScraper::with_name(reuters_fetcher.clone(), name)) as BoxedScraper
        })?;
        registry.register("bbc", move |name| {
            Box::new(BbcScraper::with_name(fetcher.clone(), name)) as BoxedScraper
        })?;
        Ok(registry)
    }

    /// Adds a source, or swaps the factory of an existing one in place.
    ///
    /// One instance is built up front to check what the type system cannot:
    /// it must carry the registered name and an absolute http(s) base URL.
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<()>
    where
        F: Fn(&str) -> BoxedScraper + Send + Sync + 'static,
    {
        let name = name.trim().to_lowercase();
        if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == '/') {
            return Err(Error::contract_violation(format!(
                "invalid source name '{}'",
                name
            )));
        }

        let probe = factory(&name);
        let meta = probe.source_metadata();
        if meta.name != name {
            return Err(Error::contract_violation(format!(
                "scraper registered as '{}' reports its name as '{}'",
                name, meta.name
            )));
        }
        let base_ok = Url::parse(meta.base_url)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .unwrap_or(false);
        if !base_ok {
            return Err(Error::contract_violation(format!(
                "scraper '{}' has no absolute http(s) base URL: '{}'",
                name, meta.base_url
            )));
        }

        let factory: ScraperFactory = Arc::new(factory);
        match self.factories.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => {
                debug!(source = %name, "Replacing scraper factory");
                slot.1 = factory;
            }
            None => {
                debug!(source = %name, base_url = meta.base_url, "Registered scraper");
                self.factories.push((name, factory));
            }
        }
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<BoxedScraper> {
        let wanted = name.trim().to_lowercase();
        match self.factories.iter().find(|(n, _)| *n == wanted) {
            Some((registered, factory)) => Ok(factory(registered)),
            None => {
                warn!(source = %name, "Unsupported source requested");
                Err(Error::unsupported_source(name, self.list_names()))
            }
        }
    }

    /// Registered names in registration order.
    pub fn list_names(&self) -> Vec<String> {
        self.factories.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }
}

/// Resolves against a shared registry; the lock is released before returning.
pub fn resolve_shared(registry: &SharedRegistry, name: &str) -> Result<BoxedScraper> {
    registry
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .resolve(name)
}

pub fn list_shared(registry: &SharedRegistry) -> Vec<String> {
    registry
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .list_names()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::{Scraper, SourceMetadata};
    use async_trait::async_trait;
    use ns_core::{ArticleFeed, CategoryListing, ExtractionContext, ExtractionResult};
    use reqwest::header::HeaderMap;

    struct NoFetch;

    #[async_trait]
    impl Fetcher for NoFetch {
        async fn fetch(&self, url: &str, _headers: &HeaderMap) -> Result<String> {
            Err(Error::extraction("test", url, "offline"))
        }
    }

    struct Relative;

    #[async_trait]
    impl Scraper for Relative {
        fn source_metadata(&self) -> SourceMetadata {
            SourceMetadata {
                name: "relative".to_string(),
                base_url: "/just/a/path",
                emoji: "❓",
            }
        }

        async fn list_categories(&self, page: &str) -> Result<CategoryListing> {
            Ok(ExtractionResult::new(ExtractionContext::for_page(page), vec![]))
        }

        async fn list_articles(&self, page: &str, category: &str, subcategory: &str) -> Result<ArticleFeed> {
            Ok(ExtractionResult::new(
                ExtractionContext::for_feed("/just/a/path", page, category, subcategory),
                vec![],
            ))
        }
    }

    fn builtin() -> ScraperRegistry {
        ScraperRegistry::with_builtin(Arc::new(NoFetch)).unwrap()
    }

    #[test]
    fn test_builtin_names_in_registration_order() {
        assert_eq!(builtin().list_names(), vec!["reuters", "bbc"]);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = builtin();
        let upper = registry.resolve("BBC").unwrap();
        let lower = registry.resolve("bbc").unwrap();
        assert_eq!(upper.source_metadata(), lower.source_metadata());
        assert_eq!(upper.source_metadata().base_url, "https://www.bbc.com");
    }

    #[test]
    fn test_unknown_source_lists_registered_names() {
        let err = builtin().resolve("unknown-source").err().unwrap();
        match err {
            Error::UnsupportedSource { name, available } => {
                assert_eq!(name, "unknown-source");
                assert_eq!(available, vec!["reuters", "bbc"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_register_rejects_relative_base_url() {
        let mut registry = builtin();
        let err = registry
            .register("relative", |_| Box::new(Relative) as BoxedScraper)
            .unwrap_err();
        assert!(matches!(err, Error::ContractViolation(_)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_rejects_bad_names() {
        let mut registry = ScraperRegistry::new();
        let fetcher: Arc<dyn Fetcher> = Arc::new(NoFetch);
        for name in ["", "  ", "world/africa", "two words"] {
            let f = fetcher.clone();
            let result = registry.register(name, move |n| Box::new(BbcScraper::with_name(f.clone(), n)) as BoxedScraper);
            assert!(matches!(result, Err(Error::ContractViolation(_))), "accepted {:?}", name);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_extends_and_replaces_in_place() {
        let mut registry = builtin();
        let fetcher: Arc<dyn Fetcher> = Arc::new(NoFetch);
        let f = fetcher.clone();
        registry
            .register("BBC-World", move |n| Box::new(BbcScraper::with_name(f.clone(), n)) as BoxedScraper)
            .unwrap();
        assert_eq!(registry.list_names(), vec!["reuters", "bbc", "bbc-world"]);

        let f = fetcher.clone();
        registry
            .register("reuters", move |n| Box::new(BbcScraper::with_name(f.clone(), n)) as BoxedScraper)
            .unwrap();
        assert_eq!(registry.list_names(), vec!["reuters", "bbc", "bbc-world"]);
        let replaced = registry.resolve("reuters").unwrap().source_metadata();
        assert_eq!(replaced.base_url, "https://www.bbc.com");
        assert_eq!(replaced.name, "reuters");
    }

    #[test]
    fn test_register_rejects_factory_ignoring_name() {
        let mut registry = ScraperRegistry::new();
        let fetcher: Arc<dyn Fetcher> = Arc::new(NoFetch);
        let err = registry
            .register("demo", move |_| Box::new(BbcScraper::new(fetcher.clone())) as BoxedScraper)
            .unwrap_err();
        assert!(matches!(err, Error::ContractViolation(ref msg) if msg.contains("'bbc'")));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_positional_ids_use_registered_name() {
        struct OneCard;

        #[async_trait]
        impl Fetcher for OneCard {
            async fn fetch(&self, _url: &str, _headers: &HeaderMap) -> Result<String> {
                Ok(r#"<div data-testid="liverpool-card"><h2>No link</h2></div>"#.to_string())
            }
        }

        let mut registry = ScraperRegistry::new();
        let fetcher: Arc<dyn Fetcher> = Arc::new(OneCard);
        registry
            .register("Demo", move |n| Box::new(BbcScraper::with_name(fetcher.clone(), n)) as BoxedScraper)
            .unwrap();

        let scraper = registry.resolve("DEMO").unwrap();
        assert_eq!(scraper.source_metadata().name, "demo");
        let feed = scraper.list_articles("news", "world", "").await.unwrap();
        assert_eq!(feed.items()[0].id, "demo_1");
    }

    #[test]
    fn test_shared_helpers() {
        let shared = builtin().into_shared();
        assert_eq!(list_shared(&shared), vec!["reuters", "bbc"]);
        assert!(resolve_shared(&shared, "Reuters").is_ok());
        assert!(matches!(
            resolve_shared(&shared, "cnn"),
            Err(e) if e.is_unsupported_source()
        ));
    }

}
