pub mod llm;
pub mod parse;

pub use llm::LlmQuizGenerator;

pub mod prelude {
    pub use crate::llm::LlmQuizGenerator;
    pub use wq_core::{Error, QuizData, QuizGenerator, Result};
}
