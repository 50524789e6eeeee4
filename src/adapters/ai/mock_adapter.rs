//! Scripted AI adapter for testing without API calls.
//!
//! Returns a fixed outcome after a simulated delay and counts invocations.

use crate::domain::{AdapterFailure, ServiceDescriptor, ServiceOutcome};
use crate::ports::AiServicePort;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

/// Scripted adapter for tests and local development.
///
/// Honors the caller's timeout the same way the real adapters do.
pub struct ScriptedAiAdapter {
    descriptor: ServiceDescriptor,
    outcome: ServiceOutcome,
    /// Simulated network delay. `None` never answers.
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedAiAdapter {
    /// Answer `Success(text)` after 10ms.
    pub fn replying(descriptor: ServiceDescriptor, text: impl Into<String>) -> Self {
        Self::with_outcome(descriptor, ServiceOutcome::success(text))
    }

    /// Answer `Failure(reason)` after 10ms.
    pub fn failing(descriptor: ServiceDescriptor, reason: impl Into<String>) -> Self {
        Self::with_outcome(descriptor, ServiceOutcome::failure(reason))
    }

    /// Never answers; only the timeout ends the call.
    pub fn hanging(descriptor: ServiceDescriptor) -> Self {
        Self {
            delay: None,
            ..Self::with_outcome(descriptor, ServiceOutcome::success(""))
        }
    }

    pub fn with_outcome(descriptor: ServiceDescriptor, outcome: ServiceOutcome) -> Self {
        Self {
            descriptor,
            outcome,
            delay: Some(Duration::from_millis(10)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Override the simulated delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AiServicePort for ScriptedAiAdapter {
    fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn ask(&self, message: &str, timeout: Duration) -> ServiceOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        info!(
            service = %self.descriptor.id,
            message_len = message.len(),
            "[MOCK] Simulating AI call"
        );

        let scripted = async {
            match self.delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => std::future::pending::<()>().await,
            }
            self.outcome.clone()
        };
        match tokio::time::timeout(timeout, scripted).await {
            Ok(outcome) => outcome,
            Err(_) => AdapterFailure::Timeout.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_reply() {
        let adapter = ScriptedAiAdapter::replying(ServiceDescriptor::gemini(), "Hi there");
        let outcome = adapter.ask("Hello", Duration::from_secs(1)).await;
        assert_eq!(outcome, ServiceOutcome::success("Hi there"));
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failure_is_verbatim() {
        let adapter = ScriptedAiAdapter::failing(ServiceDescriptor::together(), "not configured");
        let outcome = adapter.ask("Hello", Duration::from_secs(1)).await;
        assert_eq!(outcome, ServiceOutcome::failure("not configured"));
    }

    #[tokio::test]
    async fn test_hanging_times_out() {
        let adapter = ScriptedAiAdapter::hanging(ServiceDescriptor::gemini());
        let outcome = adapter.ask("Hello", Duration::from_millis(20)).await;
        assert_eq!(outcome, ServiceOutcome::failure("Request timeout"));
    }
}
