pub mod error;
pub mod generator;
pub mod scrape;
pub mod storage;
pub mod types;

pub use error::Error;
pub use generator::QuizGenerator;
pub use scrape::ArticleScraper;
pub use storage::QuizStorage;
pub use types::{
    Difficulty, NewQuizRecord, Question, QuizData, QuizRecord, QuizSummary, ScrapedPage,
};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::error::Error;
    pub use crate::types::{
        Difficulty, NewQuizRecord, Question, QuizData, QuizRecord, QuizSummary, ScrapedPage,
    };
    pub use crate::{ArticleScraper, QuizGenerator, QuizStorage, Result};
}
