use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, close_loan, list_loans, open_loan};

/// Creates the API router with all circulation endpoints
///
/// - POST /loans - Open a new loan
/// - POST /loans/:id/return - Close a loan
/// - GET /loans - List all loans
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/loans", post(open_loan).get(list_loans))
        .route("/loans/:id/return", post(close_loan))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
