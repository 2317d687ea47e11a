pub mod cli;
pub mod fetch;
pub mod logging;
pub mod registry;
pub mod scrapers;

pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use fetch::{FetchConfig, Fetcher, HttpFetcher};
pub use logging::{init_logging, Logger};
pub use registry::{ScraperRegistry, SharedRegistry};
pub use scrapers::{BoxedScraper, Scraper, SourceMetadata};

pub mod prelude {
    pub use super::fetch::Fetcher;
    pub use super::registry::{ScraperRegistry, SharedRegistry};
    pub use super::scrapers::{Scraper, SourceMetadata};
    pub use ns_core::{ArticleFeed, CategoryListing, Error, Result};
}
