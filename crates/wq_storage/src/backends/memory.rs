use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use wq_core::{NewQuizRecord, QuizRecord, QuizStorage, QuizSummary, Result};

struct MemoryStore {
    next_id: i64,
    quizzes: Vec<QuizRecord>,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            next_id: 1,
            quizzes: Vec::new(),
        }
    }

    fn insert(&mut self, quiz: NewQuizRecord) -> QuizRecord {
        // Same conflict semantics as the SQLite backend's unique url column.
        if let Some(existing) = self.quizzes.iter().find(|q| q.url == quiz.url) {
            return existing.clone();
        }

        let record = QuizRecord {
            id: self.next_id,
            url: quiz.url,
            title: quiz.title,
            created_at: Utc::now(),
            scraped_content: quiz.scraped_content,
            quiz_data: quiz.quiz_data,
        };
        self.next_id += 1;
        self.quizzes.push(record.clone());
        record
    }
}

pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuizStorage for MemoryStorage {
    async fn find_by_url(&self, url: &str) -> Result<Option<QuizRecord>> {
        let store = self.store.read().await;
        Ok(store.quizzes.iter().find(|q| q.url == url).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<QuizRecord>> {
        let store = self.store.read().await;
        Ok(store.quizzes.iter().find(|q| q.id == id).cloned())
    }

    async fn insert(&self, quiz: NewQuizRecord) -> Result<QuizRecord> {
        let mut store = self.store.write().await;
        Ok(store.insert(quiz))
    }

    async fn list_all(&self) -> Result<Vec<QuizSummary>> {
        let store = self.store.read().await;
        let mut summaries: Vec<QuizSummary> = store
            .quizzes
            .iter()
            .map(|q| QuizSummary {
                id: q.id,
                url: q.url.clone(),
                title: q.title.clone(),
                created_at: q.created_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_quiz(url: &str) -> NewQuizRecord {
        NewQuizRecord {
            url: url.to_string(),
            title: "Test Quiz".to_string(),
            scraped_content: Some("Article body".to_string()),
            quiz_data: r#"{"title":"Test Quiz","summary":"","questions":[],"related_topics":[]}"#
                .to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let storage = MemoryStorage::new();
        let first = storage.insert(sample_quiz("https://en.wikipedia.org/wiki/A")).await.unwrap();
        let second = storage.insert(sample_quiz("https://en.wikipedia.org/wiki/B")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn duplicate_url_returns_existing_record() {
        let storage = MemoryStorage::new();
        let url = "https://en.wikipedia.org/wiki/Turing_Award";
        let first = storage.insert(sample_quiz(url)).await.unwrap();
        let second = storage.insert(sample_quiz(url)).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(storage.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn find_by_url_and_id() {
        let storage = MemoryStorage::new();
        let url = "https://en.wikipedia.org/wiki/Turing_Award";
        let inserted = storage.insert(sample_quiz(url)).await.unwrap();

        let by_url = storage.find_by_url(url).await.unwrap().unwrap();
        assert_eq!(by_url.id, inserted.id);
        assert_eq!(by_url.quiz_data, inserted.quiz_data);

        let by_id = storage.find_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(by_id.url, url);

        assert!(storage.find_by_url("https://en.wikipedia.org/wiki/Other").await.unwrap().is_none());
        assert!(storage.find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let storage = MemoryStorage::new();
        storage.insert(sample_quiz("https://en.wikipedia.org/wiki/A")).await.unwrap();
        storage.insert(sample_quiz("https://en.wikipedia.org/wiki/B")).await.unwrap();
        storage.insert(sample_quiz("https://en.wikipedia.org/wiki/C")).await.unwrap();

        let summaries = storage.list_all().await.unwrap();
        let ids: Vec<i64> = summaries.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
