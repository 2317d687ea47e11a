//! Transport boundary: fetch a page body given a URL and request headers.

use std::time::Duration;

use async_trait::async_trait;
use ns_core::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::debug;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the response body, failing on transport errors and non-success statuses.
    async fn fetch(&self, url: &str, headers: &HeaderMap) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, headers: &HeaderMap) -> Result<String> {
        let response = self
            .client
            .get(url)
            .headers(headers.clone())
            .send()
            .await?
            .error_for_status()?;
        debug!(%url, status = %response.status(), "Fetched page");
        Ok(response.text().await?)
    }
}

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
// No zstd: the client has no decoder for it.
const BROWSER_ACCEPT_ENCODING: &str = "gzip, deflate, br";
const BROWSER_ACCEPT_LANGUAGE: &str =
    "da,en-US;q=0.9,en;q=0.8,fi;q=0.7,nb;q=0.6,sv;q=0.5,fr;q=0.4,fa;q=0.3,de;q=0.2";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36";

/// Header set that makes requests look like they come from a desktop browser.
pub fn default_headers() -> HeaderMap {
    let pairs: [(HeaderName, &'static str); 4] = [
        (ACCEPT, BROWSER_ACCEPT),
        (ACCEPT_ENCODING, BROWSER_ACCEPT_ENCODING),
        (ACCEPT_LANGUAGE, BROWSER_ACCEPT_LANGUAGE),
        (USER_AGENT, BROWSER_USER_AGENT),
    ];
    pairs
        .into_iter()
        .map(|(name, value)| (name, HeaderValue::from_static(value)))
        .collect()
}
