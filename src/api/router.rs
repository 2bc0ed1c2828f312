use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{AppState, create_book, list_books, reserve_book};

/// Creates the API router with all catalog endpoints
///
/// - GET /books - List books sorted by name
/// - POST /books - Register a new book
/// - POST /books/:name/:author/reserve - Reserve an available book
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/books", get(list_books).post(create_book))
        .route("/books/:name/:author/reserve", post(reserve_book))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
