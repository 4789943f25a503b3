use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use wq_core::{Error, QuizData};

use crate::error::ApiError;
use crate::service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UrlPayload {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuizResponse {
    pub quiz_id: i64,
    pub quiz_data: QuizData,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub date_generated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct QuizDetailResponse {
    pub id: i64,
    pub title: String,
    pub quiz_data: QuizData,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub valid: bool,
    pub title: String,
    pub url: String,
}

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "wikiquiz API is running" }))
}

pub async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UrlPayload>,
) -> Result<Json<GenerateQuizResponse>, ApiError> {
    let url = payload
        .url
        .ok_or_else(|| Error::InvalidUrl("Missing 'url' field".to_string()))?;

    let (quiz_id, quiz_data) = service::create_quiz(&state, &url).await?;
    Ok(Json(GenerateQuizResponse { quiz_id, quiz_data }))
}

pub async fn history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let summaries = state.storage.list_all().await?;
    let entries = summaries
        .into_iter()
        .map(|s| HistoryEntry {
            id: s.id,
            url: s.url,
            title: s.title,
            date_generated: s.created_at,
        })
        .collect();
    Ok(Json(entries))
}

pub async fn get_quiz(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<QuizDetailResponse>, ApiError> {
    let record = state
        .storage
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Quiz not found".to_string()))?;

    let quiz_data: QuizData = serde_json::from_str(&record.quiz_data).map_err(Error::from)?;
    Ok(Json(QuizDetailResponse {
        id: record.id,
        title: record.title,
        quiz_data,
    }))
}

pub async fn preview_url(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UrlPayload>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let url = payload.url.unwrap_or_default();
    let title = service::preview(&state, &url).await?;
    Ok(Json(PreviewResponse {
        valid: true,
        title,
        url: url.trim().to_string(),
    }))
}
