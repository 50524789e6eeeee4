//! AI adapter module. Implements AiServicePort for each provider.
//!
//! Provides Gemini and Together.ai adapters, a stub for services without a key,
//! and a scripted adapter for tests.

pub mod gemini_adapter;
pub mod mock_adapter;
pub mod together_adapter;
pub mod unconfigured;

pub use gemini_adapter::GeminiAdapter;
pub use mock_adapter::ScriptedAiAdapter;
pub use together_adapter::TogetherAdapter;
pub use unconfigured::UnconfiguredAdapter;

use crate::domain::{AdapterFailure, ServiceDescriptor, ServiceOutcome};
use crate::ports::AiServicePort;
use crate::shared::AppConfig;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Placeholder used when a provider answers with an empty body.
pub const EMPTY_REPLY: &str = "No response received";

/// Build one adapter per known service. Missing keys yield `UnconfiguredAdapter`
/// instead of failing, so the outcome map always has the full key set.
pub fn build_adapters(cfg: &AppConfig, client: reqwest::Client) -> Vec<Arc<dyn AiServicePort>> {
    let gemini: Arc<dyn AiServicePort> = match cfg.gemini_api_key() {
        Some(key) => {
            info!(model = %cfg.gemini_model_or_default(), "Gemini adapter enabled");
            Arc::new(GeminiAdapter::new(
                client.clone(),
                cfg.gemini_api_url_or_default(),
                key,
                cfg.gemini_model_or_default(),
            ))
        }
        None => {
            warn!("GEMINI_API_KEY not set; Gemini answers will report not configured");
            Arc::new(UnconfiguredAdapter::new(ServiceDescriptor::gemini()))
        }
    };

    let together: Arc<dyn AiServicePort> = match cfg.together_api_key() {
        Some(key) => {
            info!(model = %cfg.together_model_or_default(), "Together adapter enabled");
            Arc::new(TogetherAdapter::new(
                client,
                cfg.together_api_url_or_default(),
                key,
                cfg.together_model_or_default(),
            ))
        }
        None => {
            warn!("TOGETHER_API_KEY not set; Together answers will report not configured");
            Arc::new(UnconfiguredAdapter::new(ServiceDescriptor::together()))
        }
    };

    vec![gemini, together]
}

/// Run one provider call under `timeout` and fold the result into an outcome.
pub(crate) async fn bounded<F>(service: &str, timeout: Duration, call: F) -> ServiceOutcome
where
    F: Future<Output = Result<String, AdapterFailure>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(text)) => ServiceOutcome::success(normalize_reply(&text)),
        Ok(Err(failure)) => {
            warn!(service, error = %failure, "AI service call failed");
            failure.into()
        }
        Err(_) => {
            warn!(service, timeout_secs = timeout.as_secs_f32(), "AI service timed out");
            AdapterFailure::Timeout.into()
        }
    }
}

/// Map a reqwest error. Client-level timeouts count as `Timeout`, the rest as transport errors.
pub(crate) fn map_reqwest_error(e: reqwest::Error) -> AdapterFailure {
    if e.is_timeout() {
        AdapterFailure::Timeout
    } else {
        AdapterFailure::Transport(e.to_string())
    }
}

/// Build a `Provider` failure from a non-success response, keeping a short body excerpt.
pub(crate) async fn provider_failure(response: reqwest::Response) -> AdapterFailure {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    warn!(status = %status, body = %text, "AI API returned error");
    AdapterFailure::Provider {
        status: status.as_u16(),
        detail: text.chars().take(200).collect(),
    }
}

fn normalize_reply(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        EMPTY_REPLY.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_normalizes_empty_reply() {
        let outcome = bounded("test", Duration::from_secs(1), async { Ok("  \n".to_string()) }).await;
        assert_eq!(outcome, ServiceOutcome::success(EMPTY_REPLY));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let outcome = bounded("test", Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".to_string())
        })
        .await;
        assert_eq!(outcome, ServiceOutcome::failure("Request timeout"));
    }

    #[test]
    fn test_build_adapters_without_keys() {
        let adapters = build_adapters(&AppConfig::default(), reqwest::Client::new());
        let ids: Vec<&str> = adapters.iter().map(|a| a.descriptor().id.as_str()).collect();
        assert_eq!(ids, vec!["gemini", "together"]);
        assert!(adapters.iter().all(|a| !a.is_configured()));
    }
}
