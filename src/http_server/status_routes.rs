//! Status HTTP Routes
//!
//! Unauthenticated liveness check.

use axum::{routing::get, Router};

/// Create status routes
pub fn status_routes() -> Router {
    Router::new().route("/status", get(status_handler))
}

async fn status_handler() -> &'static str {
    "OK"
}
