use crate::server::handlers;
use crate::server::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/ask", post(handlers::ask_form))
        .route("/api/answer", post(handlers::api_answer))
        .route("/health", get(handlers::health))
        .with_state(state)
}
