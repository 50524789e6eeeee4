//! Fan-out aggregator: ask every AI service at once and join all outcomes.
//!
//! - Each adapter call runs in its own task under its own timeout
//! - A timeout or panic in one call never cancels or delays its siblings
//! - Returns only after every call has settled, with exactly one entry per adapter

use crate::domain::{AdapterFailure, OutcomeMap, ServiceDescriptor, ServiceOutcome};
use crate::ports::AiServicePort;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default per-call timeout for chat messages.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(20);

pub struct FanOutService {
    adapters: Vec<Arc<dyn AiServicePort>>,
}

impl FanOutService {
    pub fn new(adapters: Vec<Arc<dyn AiServicePort>>) -> Self {
        Self { adapters }
    }

    /// Descriptors in configuration order. Drives the formatter's section order.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.adapters.iter().map(|a| a.descriptor().clone()).collect()
    }

    /// `(service id, has credential)` for every adapter.
    pub fn configured(&self) -> Vec<(String, bool)> {
        self.adapters
            .iter()
            .map(|a| (a.descriptor().id.clone(), a.is_configured()))
            .collect()
    }

    /// Query every adapter concurrently. Never fails and never returns a partial map.
    pub async fn query_all(&self, message: &str, timeout: Duration) -> OutcomeMap {
        info!(
            services = self.adapters.len(),
            timeout_secs = timeout.as_secs_f32(),
            "querying AI services"
        );

        let calls = self.adapters.iter().map(|adapter| {
            let adapter = Arc::clone(adapter);
            let message = message.to_string();
            async move {
                let id = adapter.descriptor().id.clone();
                let outcome = Self::isolated_call(adapter, message, timeout).await;
                (id, outcome)
            }
        });

        let outcomes: OutcomeMap = join_all(calls).await.into_iter().collect();

        let succeeded: Vec<&str> = outcomes
            .iter()
            .filter(|(_, o)| o.is_success())
            .map(|(id, _)| id.as_str())
            .collect();
        info!(?succeeded, total = outcomes.len(), "AI services settled");

        outcomes
    }

    /// One adapter call on its own task. The task is aborted when `timeout` elapses,
    /// so a stuck provider cannot hold on to resources past the window.
    async fn isolated_call(
        adapter: Arc<dyn AiServicePort>,
        message: String,
        timeout: Duration,
    ) -> ServiceOutcome {
        let id = adapter.descriptor().id.clone();
        let handle = tokio::spawn(async move { adapter.ask(&message, timeout).await });
        let abort = handle.abort_handle();

        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(outcome)) => {
                debug!(service = %id, success = outcome.is_success(), "AI service answered");
                outcome
            }
            Ok(Err(join_err)) => {
                warn!(service = %id, error = %join_err, "AI service call aborted");
                AdapterFailure::Internal(join_err.to_string()).into()
            }
            Err(_) => {
                abort.abort();
                warn!(service = %id, "AI service exceeded timeout; call cancelled");
                AdapterFailure::Timeout.into()
            }
        }
    }
}
