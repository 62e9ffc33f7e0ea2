use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::Html;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use templeqa_core::traits::VectorIndexer;
use templeqa_rag::AnswerGenerator;

use crate::errors::ApiError;

const CHAT_PAGE: &str = include_str!("../static/chat.html");

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<AnswerGenerator>,
}

impl AppState {
    pub fn new(generator: AnswerGenerator) -> Self {
        Self { generator: Arc::new(generator) }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub msg: String,
}

pub async fn index() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

/// Answer one question. The model call blocks, so it runs off the async workers.
pub async fn chat(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Result<String, ApiError> {
    let started = Instant::now();
    let generator = Arc::clone(&state.generator);
    let answer = tokio::task::spawn_blocking(move || generator.answer(&form.msg)).await??;
    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        found = !matches!(answer, templeqa_rag::Answer::NotFound),
        "answered question"
    );
    Ok(answer.text().to_string())
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "chunks": state.generator.context().index().len() }))
}
