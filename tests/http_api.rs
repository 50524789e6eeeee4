// tests/http_api.rs

use axum::body::Body;
use axum::http::{Request, StatusCode};
use multi_ai_bot::adapters::ai::{ScriptedAiAdapter, UnconfiguredAdapter};
use multi_ai_bot::adapters::http::{AppState, http_router};
use multi_ai_bot::domain::{ChatUpdate, DomainError, ServiceDescriptor};
use multi_ai_bot::ports::{AiServicePort, UpdateSink};
use multi_ai_bot::usecases::{FanOutService, StatusService};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

#[derive(Default)]
struct RecordingSink {
    updates: Mutex<Vec<ChatUpdate>>,
}

#[async_trait::async_trait]
impl UpdateSink for RecordingSink {
    async fn handle_update(&self, update: ChatUpdate) -> Result<(), DomainError> {
        self.updates.lock().unwrap().push(update);
        Ok(())
    }
}

fn unconfigured() -> Vec<Arc<dyn AiServicePort>> {
    vec![
        Arc::new(UnconfiguredAdapter::new(ServiceDescriptor::gemini())),
        Arc::new(UnconfiguredAdapter::new(ServiceDescriptor::together())),
    ]
}

fn create_test_app(
    adapters: Vec<Arc<dyn AiServicePort>>,
    sink: Arc<RecordingSink>,
) -> axum::Router {
    let fan_out = Arc::new(FanOutService::new(adapters));
    let status = Arc::new(StatusService::new(Arc::clone(&fan_out)));
    let state = Arc::new(AppState {
        fan_out,
        status,
        sink,
        bot_configured: true,
        services_test_timeout: Duration::from_secs(1),
        dashboard_path: PathBuf::from("does-not-exist/index.html"),
        environment: "test".to_string(),
    });
    http_router(state)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_webhook(app: axum::Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app(unconfigured(), Arc::default());

    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_status_reports_unconfigured_services_unhealthy() {
    let app = create_test_app(unconfigured(), Arc::default());

    let (status, body) = get_json(app, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["gemini"], false);
    assert_eq!(body["services"]["together"], false);
    assert_eq!(body["bot_running"], false);
    assert_eq!(body["uptime"], "Not available");
    assert!(body["last_check"].is_string());
}

#[tokio::test]
async fn test_services_test_reports_both_failed() {
    let app = create_test_app(unconfigured(), Arc::default());

    let (status, body) = get_json(app, "/services/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["test_message"], "Hello, this is a test.");
    assert_eq!(body["responses"]["gemini"]["success"], false);
    assert_eq!(
        body["responses"]["gemini"]["error"],
        "Gemini API key not configured"
    );
    assert_eq!(body["responses"]["together"]["success"], false);
    assert_eq!(
        body["responses"]["together"]["error"],
        "Together API key not configured"
    );
}

#[tokio::test]
async fn test_services_test_with_answering_service() {
    let adapters: Vec<Arc<dyn AiServicePort>> = vec![
        Arc::new(ScriptedAiAdapter::replying(ServiceDescriptor::gemini(), "Hi there")),
        Arc::new(UnconfiguredAdapter::new(ServiceDescriptor::together())),
    ];
    let app = create_test_app(adapters, Arc::default());

    let (_, body) = get_json(app, "/services/test").await;

    assert_eq!(body["responses"]["gemini"]["success"], true);
    assert_eq!(body["responses"]["gemini"]["response"], "Hi there");
}

#[tokio::test]
async fn test_config_exposes_flags_only() {
    let adapters: Vec<Arc<dyn AiServicePort>> = vec![
        Arc::new(ScriptedAiAdapter::replying(ServiceDescriptor::gemini(), "ok")),
        Arc::new(UnconfiguredAdapter::new(ServiceDescriptor::together())),
    ];
    let app = create_test_app(adapters, Arc::default());

    let (status, body) = get_json(app, "/config").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bot_configured"], true);
    assert_eq!(body["services_configured"]["gemini"], true);
    assert_eq!(body["services_configured"]["together"], false);
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn test_webhook_forwards_update() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(unconfigured(), Arc::clone(&sink));

    let (status, body) = post_webhook(
        app,
        r#"{"update_id": 10, "message": {"message_id": 1, "chat": {"id": 42}, "text": "Hello"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let updates = sink.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].update_id, 10);
    assert_eq!(
        updates[0].message.as_ref().and_then(|m| m.text.as_deref()),
        Some("Hello")
    );
}

#[tokio::test]
async fn test_webhook_malformed_payload_is_500() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(unconfigured(), Arc::clone(&sink));

    let (status, body) = post_webhook(app, r#"{"message": "no update id"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
    assert!(body["detail"].as_str().unwrap().starts_with("Malformed update"));
    assert!(sink.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_dashboard_fallback() {
    let app = create_test_app(unconfigured(), Arc::default());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("Dashboard not found"));
}
