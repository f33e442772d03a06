use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub top_k: Option<usize>,
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let answer = state.engine.ask(&payload.question, payload.top_k).await?;
    Ok(Json(json!({
        "answer": answer.text,
        "sources": answer.sources,
    })))
}

pub async fn reindex(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let report = state.reindex().await?;
    Ok(Json(json!({ "report": report })))
}
