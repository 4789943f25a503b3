use async_trait::async_trait;

use crate::types::ScrapedPage;
use crate::Result;

#[async_trait]
pub trait ArticleScraper: Send + Sync {
    /// Name of the article source.
    fn source(&self) -> &str;

    /// Returns true if this scraper can handle the given URL.
    fn can_handle(&self, url: &str) -> bool;

    /// Reachability check: fetch the URL and verify the response status,
    /// without extracting anything.
    async fn probe(&self, url: &str) -> Result<()>;

    /// Fetch the page and extract its title and bounded plain-text body.
    async fn scrape(&self, url: &str) -> Result<ScrapedPage>;

    /// Fetch the page and extract only its title.
    async fn fetch_title(&self, url: &str) -> Result<String>;
}
