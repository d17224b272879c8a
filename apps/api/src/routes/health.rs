use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::screening::skills::LEXICON;
use crate::state::AppState;

/// GET /health
/// Reports service version, active scoring backend and lexicon size.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-screener",
        "scorer": state.scorer.backend(),
        "lexicon_size": LEXICON.len(),
    }))
}
