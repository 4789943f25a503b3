use std::env;
use std::path::PathBuf;

/// Environment-sourced settings. `LLM_API_KEY` stays optional here; the
/// generator itself refuses to start without one.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_model: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("WIKIQUIZ_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            db_path: env::var("WIKIQUIZ_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("quizzes.db")),
            llm_api_key: env::var("LLM_API_KEY").ok(),
            llm_base_url: env::var("LLM_BASE_URL").ok(),
            llm_model: env::var("LLM_MODEL").ok(),
        }
    }
}
