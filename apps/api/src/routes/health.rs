use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports version plus what the engine has loaded: vocabulary size and
/// whether a default profile is available for `/api/v1/align`.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "alignment-api",
        "vocabulary_phrases": state.vocabulary.entries().len(),
        "profile_loaded": state.profile.is_some()
    }))
}
