//! Process-wide bot status read by the monitoring endpoints.
//!
//! Owned by `StatusService`; nothing else mutates it.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct BotStatus {
    running: bool,
    started_at: Option<DateTime<Utc>>,
    last_check: Option<DateTime<Utc>>,
    services: BTreeMap<String, bool>,
}

impl BotStatus {
    /// All services start as unhealthy until the first check.
    pub fn new<I, S>(service_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            running: false,
            started_at: None,
            last_check: None,
            services: service_ids.into_iter().map(|id| (id.into(), false)).collect(),
        }
    }

    pub fn mark_running(&mut self, now: DateTime<Utc>) {
        self.running = true;
        self.started_at = Some(now);
    }

    pub fn mark_stopped(&mut self) {
        self.running = false;
    }

    /// Record the health of one service and bump the last-check timestamp.
    pub fn record_check(&mut self, service_id: &str, healthy: bool, now: DateTime<Utc>) {
        self.services.insert(service_id.to_string(), healthy);
        self.last_check = Some(now);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        self.last_check
    }

    pub fn services(&self) -> &BTreeMap<String, bool> {
        &self.services
    }

    /// "<d>d <h>h <m>m <s>s" since start, or "Not available" before `mark_running`.
    pub fn format_uptime(&self, now: DateTime<Utc>) -> String {
        let Some(started) = self.started_at else {
            return "Not available".to_string();
        };
        let secs = (now - started).num_seconds().max(0);
        let days = secs / 86_400;
        let hours = (secs % 86_400) / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_status_is_unhealthy() {
        let status = BotStatus::new(["gemini", "together"]);
        assert!(!status.is_running());
        assert_eq!(status.last_check(), None);
        assert_eq!(status.services().len(), 2);
        assert!(status.services().values().all(|h| !h));
    }

    #[test]
    fn test_record_check() {
        let mut status = BotStatus::new(["gemini", "together"]);
        let now = Utc::now();
        status.record_check("gemini", true, now);
        assert_eq!(status.services().get("gemini"), Some(&true));
        assert_eq!(status.services().get("together"), Some(&false));
        assert_eq!(status.last_check(), Some(now));
    }

    #[test]
    fn test_format_uptime() {
        let mut status = BotStatus::new(["gemini"]);
        let start = Utc::now();
        assert_eq!(status.format_uptime(start), "Not available");

        status.mark_running(start);
        let later = start + Duration::seconds(86_400 + 2 * 3600 + 3 * 60 + 4);
        assert_eq!(status.format_uptime(later), "1d 2h 3m 4s");
    }
}
