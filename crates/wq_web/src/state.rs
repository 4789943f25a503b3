use std::sync::Arc;

use wq_core::{ArticleScraper, QuizGenerator, QuizStorage};

pub struct AppState {
    pub storage: Arc<dyn QuizStorage>,
    pub scraper: Arc<dyn ArticleScraper>,
    pub generator: Arc<dyn QuizGenerator>,
}
