use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::state::AppState;

/// GET /api/config - current configuration with secrets masked.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.config_service.redacted(&state.config))
}
