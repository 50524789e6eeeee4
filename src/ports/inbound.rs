//! Inbound port. Webhook and polling adapters call into the application.

use crate::domain::{ChatUpdate, DomainError};

/// Receives platform updates (from the webhook route or the polling loop).
#[async_trait::async_trait]
pub trait UpdateSink: Send + Sync {
    /// Process one update end-to-end. Per-service and delivery failures are handled
    /// inside; an `Err` means the update itself could not be processed.
    async fn handle_update(&self, update: ChatUpdate) -> Result<(), DomainError>;
}
