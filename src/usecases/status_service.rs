//! Status check routine. The only writer of `BotStatus`.

use crate::domain::{BotStatus, OutcomeMap};
use crate::usecases::fan_out::FanOutService;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Point-in-time view of the bot for `/status` and the `/status` command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub bot_running: bool,
    pub services: BTreeMap<String, bool>,
    pub uptime: String,
    pub last_check: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

pub struct StatusService {
    fan_out: Arc<FanOutService>,
    status: RwLock<BotStatus>,
}

impl StatusService {
    pub fn new(fan_out: Arc<FanOutService>) -> Self {
        let ids = fan_out.configured().into_iter().map(|(id, _)| id);
        Self {
            status: RwLock::new(BotStatus::new(ids)),
            fan_out,
        }
    }

    pub async fn mark_running(&self) {
        self.status.write().await.mark_running(Utc::now());
        info!("bot marked running");
    }

    pub async fn mark_stopped(&self) {
        self.status.write().await.mark_stopped();
        info!("bot marked stopped");
    }

    /// Re-evaluate every service and record the result. A service counts as healthy
    /// when its credential is configured; no provider call is made.
    pub async fn check(&self) -> StatusReport {
        let now = Utc::now();
        {
            let mut status = self.status.write().await;
            for (id, configured) in self.fan_out.configured() {
                status.record_check(&id, configured, now);
            }
        }
        self.report().await
    }

    /// Record health from the outcomes of a real fan-out: a service is healthy when it answered.
    pub async fn record_outcomes(&self, outcomes: &OutcomeMap) {
        let now = Utc::now();
        let mut status = self.status.write().await;
        for (id, outcome) in outcomes {
            status.record_check(id, outcome.is_success(), now);
        }
    }

    /// Current state without running a check.
    pub async fn report(&self) -> StatusReport {
        let status = self.status.read().await;
        let now = Utc::now();
        StatusReport {
            bot_running: status.is_running(),
            services: status.services().clone(),
            uptime: status.format_uptime(now),
            last_check: status.last_check(),
            timestamp: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{ScriptedAiAdapter, UnconfiguredAdapter};
    use crate::domain::ServiceDescriptor;

    fn service(configured_gemini: bool) -> StatusService {
        let gemini: Arc<dyn crate::ports::AiServicePort> = if configured_gemini {
            Arc::new(ScriptedAiAdapter::replying(ServiceDescriptor::gemini(), "hi"))
        } else {
            Arc::new(UnconfiguredAdapter::new(ServiceDescriptor::gemini()))
        };
        let fan_out = FanOutService::new(vec![
            gemini,
            Arc::new(UnconfiguredAdapter::new(ServiceDescriptor::together())),
        ]);
        StatusService::new(Arc::new(fan_out))
    }

    #[tokio::test]
    async fn test_report_before_check() {
        let svc = service(true);
        let report = svc.report().await;
        assert!(!report.bot_running);
        assert_eq!(report.last_check, None);
        assert_eq!(report.uptime, "Not available");
        assert_eq!(report.services.get("gemini"), Some(&false));
    }

    #[tokio::test]
    async fn test_check_records_configured_services() {
        let svc = service(true);
        svc.mark_running().await;
        let report = svc.check().await;

        assert!(report.bot_running);
        assert!(report.last_check.is_some());
        assert_eq!(report.services.get("gemini"), Some(&true));
        assert_eq!(report.services.get("together"), Some(&false));
        assert!(report.uptime.starts_with("0d 0h 0m"));
    }

    #[tokio::test]
    async fn test_unconfigured_services_are_unhealthy() {
        let svc = service(false);
        let report = svc.check().await;
        assert!(report.services.values().all(|healthy| !healthy));
    }

    #[tokio::test]
    async fn test_record_outcomes_uses_success() {
        let svc = service(true);
        let outcomes = OutcomeMap::from([
            ("gemini".to_string(), crate::domain::ServiceOutcome::failure("API error 500")),
            ("together".to_string(), crate::domain::ServiceOutcome::success("hi")),
        ]);
        svc.record_outcomes(&outcomes).await;

        let report = svc.report().await;
        assert_eq!(report.services.get("gemini"), Some(&false));
        assert_eq!(report.services.get("together"), Some(&true));
        assert!(report.last_check.is_some());
    }

    #[tokio::test]
    async fn test_mark_stopped() {
        let svc = service(true);
        svc.mark_running().await;
        svc.mark_stopped().await;
        assert!(!svc.report().await.bot_running);
    }
}
