//! HTTP front end for the temple assistant.

pub mod errors;
pub mod handlers;

use axum::routing::get;
use axum::Router;

pub use handlers::AppState;

/// Build the router: chat page, answer endpoint and health check.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/get", get(handlers::chat).post(handlers::chat))
        .route("/health", get(handlers::health))
        .with_state(state)
}
