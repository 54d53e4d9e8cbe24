use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let indexed_chunks = state.store.count().await.unwrap_or(0);
    Json(json!({
        "catalog_rows": state.catalog.len(),
        "indexed_chunks": indexed_chunks,
        "history_turns": state.history.len(),
        "provider": state.provider.name(),
        "chat_model": state.config.llm.chat_model,
    }))
}
