//! HTTP surface: dashboard, status, health, webhook, service test, config.

pub mod error;
pub mod handlers;
pub mod router;

pub use error::{ApiError, ApiResult};
pub use router::http_router;

use crate::ports::UpdateSink;
use crate::usecases::{FanOutService, StatusService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Shared state handed to every handler.
pub struct AppState {
    pub fan_out: Arc<FanOutService>,
    pub status: Arc<StatusService>,
    /// Receives webhook updates.
    pub sink: Arc<dyn UpdateSink>,
    pub bot_configured: bool,
    pub services_test_timeout: Duration,
    pub dashboard_path: PathBuf,
    pub environment: String,
}
