use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::history::ConversationTurn;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub response: String,
}

/// POST /api/query - run one recommendation turn.
///
/// Failures come back as a readable message in the normal response shape,
/// the way the form expects them, not as structured error codes.
pub async fn submit_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryResponse> {
    let response = match state.query_handler.handle(&request.query).await {
        Ok(text) => text,
        Err(err) => {
            tracing::error!("Query failed: {}", err);
            format!("Error processing query: {}", err)
        }
    };

    Json(QueryResponse { response })
}

/// GET /api/history - the full shared conversation log.
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<ConversationTurn>> {
    Json(state.history.snapshot())
}
