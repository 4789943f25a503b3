use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A quiz as persisted in the store, one row per source URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub scraped_content: Option<String>,
    /// Serialized `QuizData` JSON, stored verbatim.
    pub quiz_data: String,
}

/// Insert-side shape of a quiz record; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewQuizRecord {
    pub url: String,
    pub title: String,
    pub scraped_content: Option<String>,
    pub quiz_data: String,
}

/// Listing row for the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Title and bounded plain-text body extracted from an article page.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    pub title: String,
    pub content: String,
}

/// The structured quiz produced by the generator.
///
/// Wire names match the JSON the LLM is prompted for: `question` holds the
/// question text, `related_topics` is snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub questions: Vec<Question>,
    #[serde(default, deserialize_with = "lenient_topics")]
    pub related_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default, deserialize_with = "lenient_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Case-insensitive, whitespace-tolerant parse; anything unrecognized
    /// coerces to medium.
    pub fn from_str_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

fn lenient_difficulty<'de, D>(deserializer: D) -> Result<Difficulty, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value.as_str() {
        Some(s) => Difficulty::from_str_lenient(s),
        None => Difficulty::Medium,
    })
}

fn lenient_topics<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default())
}
