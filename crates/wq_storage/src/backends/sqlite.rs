use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;

use wq_core::{Error, NewQuizRecord, QuizRecord, QuizStorage, QuizSummary, Result};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS quizzes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        created_at TEXT NOT NULL,
        scraped_content TEXT,
        quiz_data TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

impl SqliteStorage {
    pub async fn new() -> Result<Self> {
        Self::new_with_path(Path::new("quizzes.db")).await
    }

    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Database(format!("Failed to parse timestamp: {}", e)))
}

fn row_to_record(row: &SqliteRow) -> Result<QuizRecord> {
    Ok(QuizRecord {
        id: row.get("id"),
        url: row.get("url"),
        title: row.get("title"),
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
        scraped_content: row.get("scraped_content"),
        quiz_data: row.get("quiz_data"),
    })
}

#[async_trait]
impl QuizStorage for SqliteStorage {
    async fn find_by_url(&self, url: &str) -> Result<Option<QuizRecord>> {
        let row = sqlx::query("SELECT * FROM quizzes WHERE url = ?")
            .bind(url)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to query by url: {}", e)))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<QuizRecord>> {
        let row = sqlx::query("SELECT * FROM quizzes WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to query by id: {}", e)))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn insert(&self, quiz: NewQuizRecord) -> Result<QuizRecord> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO quizzes (url, title, created_at, scraped_content, quiz_data)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(url) DO NOTHING
            "#,
        )
        .bind(&quiz.url)
        .bind(&quiz.title)
        .bind(created_at.to_rfc3339())
        .bind(quiz.scraped_content.as_deref())
        .bind(&quiz.quiz_data)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to insert quiz: {}", e)))?;

        if result.rows_affected() == 0 {
            // Lost a first-insert race for this url; hand back the winner.
            tracing::debug!("insert conflict for {}, returning existing record", quiz.url);
            return self
                .find_by_url(&quiz.url)
                .await?
                .ok_or_else(|| Error::Database("Conflicting row disappeared".to_string()));
        }

        Ok(QuizRecord {
            id: result.last_insert_rowid(),
            url: quiz.url,
            title: quiz.title,
            created_at,
            scraped_content: quiz.scraped_content,
            quiz_data: quiz.quiz_data,
        })
    }

    async fn list_all(&self) -> Result<Vec<QuizSummary>> {
        let rows = sqlx::query(
            "SELECT id, url, title, created_at FROM quizzes ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list quizzes: {}", e)))?;

        rows.iter()
            .map(|row| {
                Ok(QuizSummary {
                    id: row.get("id"),
                    url: row.get("url"),
                    title: row.get("title"),
                    created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_quiz(url: &str, title: &str) -> NewQuizRecord {
        NewQuizRecord {
            url: url.to_string(),
            title: title.to_string(),
            scraped_content: Some("Scraped article text".to_string()),
            quiz_data: format!(
                r#"{{"title":"{}","summary":"","questions":[],"related_topics":[]}}"#,
                title
            ),
        }
    }

    #[tokio::test]
    async fn insert_and_read_back() {
        let temp_dir = tempdir().unwrap();
        let storage = SqliteStorage::new_with_path(&temp_dir.path().join("test.db"))
            .await
            .unwrap();

        let url = "https://en.wikipedia.org/wiki/Turing_Award";
        let inserted = storage.insert(sample_quiz(url, "Turing Award")).await.unwrap();
        assert!(inserted.id > 0);

        let by_url = storage.find_by_url(url).await.unwrap().unwrap();
        assert_eq!(by_url.id, inserted.id);
        assert_eq!(by_url.title, "Turing Award");
        assert_eq!(by_url.quiz_data, inserted.quiz_data);
        assert_eq!(by_url.scraped_content.as_deref(), Some("Scraped article text"));

        let by_id = storage.find_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(by_id.url, url);

        assert!(storage
            .find_by_url("https://en.wikipedia.org/wiki/Other")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unique_url_collapses_duplicate_inserts() {
        let temp_dir = tempdir().unwrap();
        let storage = SqliteStorage::new_with_path(&temp_dir.path().join("test.db"))
            .await
            .unwrap();

        let url = "https://en.wikipedia.org/wiki/Turing_Award";
        let first = storage.insert(sample_quiz(url, "First")).await.unwrap();
        let second = storage.insert(sample_quiz(url, "Second")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.title, "First");
        assert_eq!(storage.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let temp_dir = tempdir().unwrap();
        let storage = SqliteStorage::new_with_path(&temp_dir.path().join("test.db"))
            .await
            .unwrap();

        for name in ["A", "B", "C"] {
            storage
                .insert(sample_quiz(
                    &format!("https://en.wikipedia.org/wiki/{}", name),
                    name,
                ))
                .await
                .unwrap();
        }

        let summaries = storage.list_all().await.unwrap();
        let titles: Vec<&str> = summaries.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn reopening_database_keeps_rows() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let storage = SqliteStorage::new_with_path(&db_path).await.unwrap();
            storage
                .insert(sample_quiz("https://en.wikipedia.org/wiki/A", "A"))
                .await
                .unwrap();
        }

        let reopened = SqliteStorage::new_with_path(&db_path).await.unwrap();
        assert_eq!(reopened.list_all().await.unwrap().len(), 1);
    }
}
