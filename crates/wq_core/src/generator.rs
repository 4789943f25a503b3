use async_trait::async_trait;

use crate::types::QuizData;
use crate::Result;

#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Name of the backing model or service.
    fn name(&self) -> &str;

    /// Turn an article into a structured quiz. Transport failures and
    /// unparseable model output both surface as `Error::Generation`;
    /// nothing is retried.
    async fn generate_quiz(&self, title: &str, content: &str) -> Result<QuizData>;
}
