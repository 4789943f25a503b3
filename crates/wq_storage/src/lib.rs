pub mod backends;

pub use backends::*;

pub mod prelude {
    pub use crate::backends::*;
    pub use wq_core::{NewQuizRecord, QuizRecord, QuizStorage, QuizSummary, Result};
}
