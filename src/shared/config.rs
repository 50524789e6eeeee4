//! Application configuration. Credentials, endpoints, limits.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Telegram rejects messages above 4096 characters; keep some headroom.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 4000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_AGGREGATE_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_SERVICES_TEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PORT: u16 = 5000;

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TOGETHER_API_URL: &str = "https://api.together.xyz/v1/chat/completions";
pub const DEFAULT_TOGETHER_MODEL: &str = "meta-llama/Llama-3.2-11B-Vision-Instruct-Turbo";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Fatal startup errors. The process does not start when `validate` fails.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN environment variable is required")]
    MissingBotToken,

    #[error("At least one AI service API key must be configured")]
    NoServicesConfigured,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    /// Bot API token. Read from TELEGRAM_BOT_TOKEN.
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    /// Bot API base URL. Read from TELEGRAM_API_URL.
    #[serde(default)]
    pub telegram_api_url: Option<String>,

    /// Public URL to register as webhook. When unset the bot long-polls. Read from WEBHOOK_URL.
    #[serde(default)]
    pub webhook_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // AI Services
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from GEMINI_API_KEY.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Read from GEMINI_API_URL.
    #[serde(default)]
    pub gemini_api_url: Option<String>,

    /// Read from GEMINI_MODEL.
    #[serde(default)]
    pub gemini_model: Option<String>,

    /// Read from TOGETHER_API_KEY.
    #[serde(default)]
    pub together_api_key: Option<String>,

    /// Read from TOGETHER_API_URL.
    #[serde(default)]
    pub together_api_url: Option<String>,

    /// Read from TOGETHER_MODEL.
    #[serde(default)]
    pub together_model: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Limits & Timeouts
    // ─────────────────────────────────────────────────────────────────────────
    /// Upper bound for a single HTTP request in seconds (default 30). Read from REQUEST_TIMEOUT.
    #[serde(default)]
    pub request_timeout: Option<u64>,

    /// Per-message fan-out timeout in seconds (default 20). Read from AGGREGATE_TIMEOUT.
    #[serde(default)]
    pub aggregate_timeout: Option<u64>,

    /// Timeout for `/services/test` in seconds (default 10). Read from SERVICES_TEST_TIMEOUT.
    #[serde(default)]
    pub services_test_timeout: Option<u64>,

    /// Overall cap for one formatted reply (default 4000). Read from MAX_MESSAGE_LENGTH.
    #[serde(default)]
    pub max_message_length: Option<usize>,

    // ─────────────────────────────────────────────────────────────────────────
    // Server & Logging
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from PORT.
    #[serde(default)]
    pub port: Option<u16>,

    /// tracing filter directive (e.g. "info", "multi_ai_bot=debug"). Read from LOG_LEVEL.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Read from DASHBOARD_PATH.
    #[serde(default)]
    pub dashboard_path: Option<String>,

    /// Deployment label shown on `/config`. Read from ENVIRONMENT or NODE_ENV.
    #[serde(default)]
    pub environment: Option<String>,
}

impl AppConfig {
    /// Load from `MULTI_AI_BOT_*` env vars, an optional file named by MULTI_AI_BOT_CONFIG,
    /// then the plain variable names on top. Call after `.env` has been read.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("MULTI_AI_BOT").try_parsing(true));
        if let Ok(path) = std::env::var("MULTI_AI_BOT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Overlay the plain (unprefixed) variable names. `lookup` is injected so tests
    /// don't have to touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = text("TELEGRAM_BOT_TOKEN") {
            self.telegram_bot_token = Some(v);
        }
        if let Some(v) = text("TELEGRAM_API_URL") {
            self.telegram_api_url = Some(v);
        }
        if let Some(v) = text("WEBHOOK_URL") {
            self.webhook_url = Some(v);
        }
        if let Some(v) = text("GEMINI_API_KEY") {
            self.gemini_api_key = Some(v);
        }
        if let Some(v) = text("GEMINI_API_URL") {
            self.gemini_api_url = Some(v);
        }
        if let Some(v) = text("GEMINI_MODEL") {
            self.gemini_model = Some(v);
        }
        if let Some(v) = text("TOGETHER_API_KEY") {
            self.together_api_key = Some(v);
        }
        if let Some(v) = text("TOGETHER_API_URL") {
            self.together_api_url = Some(v);
        }
        if let Some(v) = text("TOGETHER_MODEL") {
            self.together_model = Some(v);
        }
        if let Some(n) = text("REQUEST_TIMEOUT").and_then(|s| s.parse().ok()) {
            self.request_timeout = Some(n);
        }
        if let Some(n) = text("AGGREGATE_TIMEOUT").and_then(|s| s.parse().ok()) {
            self.aggregate_timeout = Some(n);
        }
        if let Some(n) = text("SERVICES_TEST_TIMEOUT").and_then(|s| s.parse().ok()) {
            self.services_test_timeout = Some(n);
        }
        if let Some(n) = text("MAX_MESSAGE_LENGTH").and_then(|s| s.parse().ok()) {
            self.max_message_length = Some(n);
        }
        if let Some(n) = text("PORT").and_then(|s| s.parse().ok()) {
            self.port = Some(n);
        }
        if let Some(v) = text("LOG_LEVEL") {
            self.log_level = Some(v);
        }
        if let Some(v) = text("DASHBOARD_PATH") {
            self.dashboard_path = Some(v);
        }
        if let Some(v) = text("ENVIRONMENT").or_else(|| text("NODE_ENV")) {
            self.environment = Some(v);
        }
    }

    /// Fail fast on a missing bot token or when no AI service has a key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram_bot_token().is_none() {
            return Err(ConfigError::MissingBotToken);
        }
        if !self.is_gemini_configured() && !self.is_together_configured() {
            return Err(ConfigError::NoServicesConfigured);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Credential Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn telegram_bot_token(&self) -> Option<String> {
        non_empty(&self.telegram_bot_token)
    }

    pub fn gemini_api_key(&self) -> Option<String> {
        non_empty(&self.gemini_api_key)
    }

    pub fn together_api_key(&self) -> Option<String> {
        non_empty(&self.together_api_key)
    }

    pub fn is_bot_configured(&self) -> bool {
        self.telegram_bot_token().is_some()
    }

    pub fn is_gemini_configured(&self) -> bool {
        self.gemini_api_key().is_some()
    }

    pub fn is_together_configured(&self) -> bool {
        self.together_api_key().is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Defaults
    // ─────────────────────────────────────────────────────────────────────────

    pub fn telegram_api_url_or_default(&self) -> String {
        non_empty(&self.telegram_api_url).unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string())
    }

    pub fn webhook_url(&self) -> Option<String> {
        non_empty(&self.webhook_url)
    }

    pub fn gemini_api_url_or_default(&self) -> String {
        non_empty(&self.gemini_api_url).unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string())
    }

    pub fn gemini_model_or_default(&self) -> String {
        non_empty(&self.gemini_model).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string())
    }

    pub fn together_api_url_or_default(&self) -> String {
        non_empty(&self.together_api_url).unwrap_or_else(|| DEFAULT_TOGETHER_API_URL.to_string())
    }

    pub fn together_model_or_default(&self) -> String {
        non_empty(&self.together_model).unwrap_or_else(|| DEFAULT_TOGETHER_MODEL.to_string())
    }

    pub fn request_timeout_or_default(&self) -> Duration {
        Duration::from_secs(self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn aggregate_timeout_or_default(&self) -> Duration {
        Duration::from_secs(
            self.aggregate_timeout
                .unwrap_or(DEFAULT_AGGREGATE_TIMEOUT_SECS),
        )
    }

    pub fn services_test_timeout_or_default(&self) -> Duration {
        Duration::from_secs(
            self.services_test_timeout
                .unwrap_or(DEFAULT_SERVICES_TEST_TIMEOUT_SECS),
        )
    }

    pub fn max_message_length_or_default(&self) -> usize {
        self.max_message_length
            .unwrap_or(DEFAULT_MAX_MESSAGE_LENGTH)
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn log_level_or_default(&self) -> String {
        non_empty(&self.log_level).unwrap_or_else(|| "info".to_string())
    }

    pub fn dashboard_path_or_default(&self) -> String {
        non_empty(&self.dashboard_path).unwrap_or_else(|| "index.html".to_string())
    }

    pub fn environment_or_default(&self) -> String {
        non_empty(&self.environment).unwrap_or_else(|| "development".to_string())
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut cfg = AppConfig::default();
        cfg.apply_env(|key| env.get(key).cloned());
        cfg
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.request_timeout_or_default(), Duration::from_secs(30));
        assert_eq!(cfg.aggregate_timeout_or_default(), Duration::from_secs(20));
        assert_eq!(
            cfg.services_test_timeout_or_default(),
            Duration::from_secs(10)
        );
        assert_eq!(cfg.max_message_length_or_default(), 4000);
        assert_eq!(cfg.port_or_default(), 5000);
        assert_eq!(cfg.log_level_or_default(), "info");
        assert_eq!(cfg.environment_or_default(), "development");
    }

    #[test]
    fn test_apply_env() {
        let cfg = from_pairs(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("GEMINI_API_KEY", "g-key"),
            ("REQUEST_TIMEOUT", "12"),
            ("MAX_MESSAGE_LENGTH", "3000"),
            ("PORT", "8080"),
            ("NODE_ENV", "production"),
        ]);
        assert_eq!(cfg.telegram_bot_token().as_deref(), Some("123:abc"));
        assert!(cfg.is_gemini_configured());
        assert!(!cfg.is_together_configured());
        assert_eq!(cfg.request_timeout_or_default(), Duration::from_secs(12));
        assert_eq!(cfg.max_message_length_or_default(), 3000);
        assert_eq!(cfg.port_or_default(), 8080);
        assert_eq!(cfg.environment_or_default(), "production");
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let cfg = from_pairs(&[("PORT", "not-a-port"), ("REQUEST_TIMEOUT", "")]);
        assert_eq!(cfg.port_or_default(), 5000);
        assert_eq!(cfg.request_timeout_or_default(), Duration::from_secs(30));
    }

    #[test]
    fn test_validate_requires_bot_token() {
        let cfg = from_pairs(&[("GEMINI_API_KEY", "g-key")]);
        assert_eq!(cfg.validate(), Err(ConfigError::MissingBotToken));
    }

    #[test]
    fn test_validate_requires_one_service() {
        let cfg = from_pairs(&[("TELEGRAM_BOT_TOKEN", "123:abc"), ("GEMINI_API_KEY", "  ")]);
        assert_eq!(cfg.validate(), Err(ConfigError::NoServicesConfigured));

        let cfg = from_pairs(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TOGETHER_API_KEY", "t-key"),
        ]);
        assert_eq!(cfg.validate(), Ok(()));
    }
}
