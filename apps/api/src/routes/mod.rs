pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/job", post(handlers::handle_set_job))
        .route("/api/upload", post(handlers::handle_upload))
        .route("/api/candidates", get(handlers::handle_list_candidates))
        .route("/api/screen", post(handlers::handle_screen))
        .route("/api/export", get(handlers::handle_export))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
