use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use wq_core::{ArticleScraper, Error, Result, ScrapedPage};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FETCH_TIMEOUT_SECS: u64 = 10;
const MAX_CONTENT_LENGTH: usize = 10_000;
const MIN_PARAGRAPH_LENGTH: usize = 40;

static WIKI_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(en\.)?wikipedia\.org/wiki/[A-Za-z0-9_\-()%,.]+$").unwrap()
});

/// Returns true for article URLs on (en.)wikipedia.org.
pub fn is_wikipedia_url(url: &str) -> bool {
    WIKI_URL_RE.is_match(url)
}

pub struct WikipediaScraper {
    client: reqwest::Client,
}

impl WikipediaScraper {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        Url::parse(url).map_err(|e| Error::Scraping(format!("Failed to parse URL: {}", e)))?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Scraping(format!(
                "Upstream returned {} for {}",
                response.status(),
                url
            )));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl ArticleScraper for WikipediaScraper {
    fn source(&self) -> &str {
        "Wikipedia"
    }

    fn can_handle(&self, url: &str) -> bool {
        is_wikipedia_url(url)
    }

    async fn probe(&self, url: &str) -> Result<()> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Scraping(format!(
                "Upstream returned {} for {}",
                response.status(),
                url
            )));
        }
        Ok(())
    }

    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        tracing::debug!("scraping {}", url);
        let html = self.fetch_html(url).await?;
        extract_article(&html)
    }

    async fn fetch_title(&self, url: &str) -> Result<String> {
        let html = self.fetch_html(url).await?;
        extract_title(&Html::parse_document(&html))
    }
}

/// Pull the title and readable paragraph text out of a Wikipedia article
/// page. Paragraphs under the parser-output container shorter than 40
/// characters are dropped; the joined text is capped at 10,000 characters.
pub fn extract_article(html: &str) -> Result<ScrapedPage> {
    let document = Html::parse_document(html);

    let title = extract_title(&document)?;

    let paragraph_selector = Selector::parse("div.mw-parser-output > p").unwrap();
    let paragraphs: Vec<String> = document
        .select(&paragraph_selector)
        .map(|el| normalize_text(&el.text().collect::<String>()))
        .filter(|text| text.len() > MIN_PARAGRAPH_LENGTH)
        .collect();

    let content = truncate_chars(&paragraphs.join(" "), MAX_CONTENT_LENGTH);

    Ok(ScrapedPage { title, content })
}

fn extract_title(document: &Html) -> Result<String> {
    let title_selector = Selector::parse("h1#firstHeading").unwrap();
    document
        .select(&title_selector)
        .next()
        .map(|el| normalize_text(&el.text().collect::<String>()))
        .filter(|title| !title.is_empty())
        .ok_or_else(|| Error::Scraping("Page has no firstHeading element".to_string()))
}

/// Collapse runs of whitespace into single spaces and trim.
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
