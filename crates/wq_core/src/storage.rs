use async_trait::async_trait;

use crate::types::{NewQuizRecord, QuizRecord, QuizSummary};
use crate::Result;

#[async_trait]
pub trait QuizStorage: Send + Sync {
    /// Look up the cached quiz for a source URL.
    async fn find_by_url(&self, url: &str) -> Result<Option<QuizRecord>>;

    /// Look up a quiz by its store-assigned id.
    async fn find_by_id(&self, id: i64) -> Result<Option<QuizRecord>>;

    /// Insert a quiz and return it with its assigned id. If a record for
    /// the same URL already exists, the existing record is returned.
    async fn insert(&self, quiz: NewQuizRecord) -> Result<QuizRecord>;

    /// All stored quizzes as summaries, newest first.
    async fn list_all(&self) -> Result<Vec<QuizSummary>>;
}
