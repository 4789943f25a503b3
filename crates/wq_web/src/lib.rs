use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod service;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::root))
        .route("/generate_quiz", post(handlers::generate_quiz))
        .route("/history", get(handlers::history))
        .route("/quiz/:id", get(handlers::get_quiz))
        .route("/preview_url", post(handlers::preview_url))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::service;
    pub use crate::AppState;
    pub use wq_core::{QuizData, Result};
}
