//! Route table for the HTTP surface.

use crate::adapters::http::AppState;
use crate::adapters::http::handlers::{
    config_handler, dashboard_handler, health_handler, services_test_handler, status_handler,
    webhook_handler,
};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn http_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .route("/services/test", get(services_test_handler))
        .route("/config", get(config_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
