pub mod wikipedia;

pub use wikipedia::{is_wikipedia_url, WikipediaScraper};

pub mod prelude {
    pub use crate::wikipedia::{is_wikipedia_url, WikipediaScraper};
    pub use wq_core::{ArticleScraper, Error, Result, ScrapedPage};
}
