//! Handlers for the monitoring and webhook endpoints.

use crate::adapters::http::error::ApiResult;
use crate::adapters::http::AppState;
use crate::adapters::telegram::mapper;
use crate::domain::DomainError;
use crate::usecases::StatusReport;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::Html;
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info};

/// Sent to every service by `/services/test`.
pub const TEST_MESSAGE: &str = "Hello, this is a test.";

const DASHBOARD_FALLBACK: &str = "<h1>Multi-AI Telegram Bot</h1><p>Dashboard not found</p>";

pub async fn dashboard_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    match tokio::fs::read_to_string(&state.dashboard_path).await {
        Ok(html) => Html(html),
        Err(_) => Html(DASHBOARD_FALLBACK.to_string()),
    }
}

/// Runs the status check, then reports.
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusReport> {
    Json(state.status.check().await)
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Accepts a raw Bot API update and runs it through the chat handler.
pub async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let result: Result<(), DomainError> = async {
        let payload: Value =
            serde_json::from_slice(&body).map_err(|e| DomainError::Update(e.to_string()))?;
        let update = mapper::parse_update(payload)?;
        info!(update_id = update.update_id, "webhook update received");
        state.sink.handle_update(update).await
    }
    .await;

    if let Err(e) = result {
        error!(error = %e, "webhook error");
        return Err(e.into());
    }
    Ok(Json(json!({"status": "ok"})))
}

pub async fn services_test_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let responses = state
        .fan_out
        .query_all(TEST_MESSAGE, state.services_test_timeout)
        .await;
    Json(json!({
        "test_message": TEST_MESSAGE,
        "responses": responses,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Configured/not-configured flags only. Secret values never leave the process.
pub async fn config_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let services: serde_json::Map<String, Value> = state
        .fan_out
        .configured()
        .into_iter()
        .map(|(id, configured)| (id, Value::Bool(configured)))
        .collect();
    Json(json!({
        "bot_configured": state.bot_configured,
        "services_configured": services,
        "environment": state.environment,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
