use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use wq_core::{Error, QuizData, QuizGenerator, Result};

use crate::parse::parse_quiz_response;

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
const DEFAULT_MODEL: &str = "deepseek-chat";
const MAX_PROMPT_TEXT_LENGTH: usize = 15_000;

const PROMPT_TEMPLATE: &str = r#"You are an assistant that converts a given article into a structured quiz.

Generate a JSON object in this exact format:

{
  "title": "<short quiz title>",
  "summary": "<2-3 line summary of the article>",
  "questions": [
    {
      "question": "<question text>",
      "options": ["<option A>", "<option B>", "<option C>", "<option D>"],
      "answer": "<the exact correct option text>",
      "difficulty": "<easy|medium|hard>",
      "explanation": "<1-2 line explanation based on the article>"
    }
  ],
  "related_topics": ["<topic 1>", "<topic 2>", "<topic 3>"]
}

Guidelines:
- Always output valid JSON only (no markdown, no extra text).
- Generate 8-10 questions.
- Difficulty rules:
  - easy = factual recall
  - medium = conceptual understanding
  - hard = reasoning / inference
- The answer must exactly match one option.
- Explanations must be grounded in the article content.
- related_topics must be Wikipedia-style topic names."#;

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

pub struct LlmQuizGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmQuizGenerator {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Generation("LLM API key is required".to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_prompt(title: &str, content: &str) -> String {
        format!(
            "{}\n\nArticle Title: {}\n\nArticle Content:\n{}",
            PROMPT_TEMPLATE,
            title,
            truncate_chars(content, MAX_PROMPT_TEXT_LENGTH)
        )
    }

    async fn chat(&self, prompt: String) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| Error::Generation("Model returned no choices".to_string()))
    }
}

impl fmt::Debug for LlmQuizGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmQuizGenerator")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl QuizGenerator for LlmQuizGenerator {
    fn name(&self) -> &str {
        "llm"
    }

    async fn generate_quiz(&self, title: &str, content: &str) -> Result<QuizData> {
        let prompt = Self::build_prompt(title, content);
        debug!("sending quiz prompt for {:?} to {}", title, self.model);

        let body = match self.chat(prompt).await {
            Ok(body) => body,
            Err(e) => {
                warn!("LLM request failed: {}", e);
                return Err(Error::Generation(format!("LLM request failed: {}", e)));
            }
        };

        debug!("model response received ({} bytes)", body.len());
        parse_quiz_response(&body)
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_requires_api_key() {
        assert!(LlmQuizGenerator::new(None).is_err());
        assert!(LlmQuizGenerator::new(Some(String::new())).is_err());
        assert!(LlmQuizGenerator::new(Some("test-key".to_string())).is_ok());
    }

    #[test]
    fn prompt_truncates_article_text() {
        let content = "x".repeat(MAX_PROMPT_TEXT_LENGTH + 500);
        let prompt = LlmQuizGenerator::build_prompt("Title", &content);
        let inserted = prompt.split("Article Content:\n").nth(1).unwrap();
        assert_eq!(inserted.chars().count(), MAX_PROMPT_TEXT_LENGTH);
    }

    #[test]
    fn debug_redacts_api_key() {
        let generator = LlmQuizGenerator::new(Some("secret".to_string())).unwrap();
        let debug = format!("{:?}", generator);
        assert!(!debug.contains("secret"));
    }
}
