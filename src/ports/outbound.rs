//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    ChatUpdate, DomainError, ParseMode, SentMessage, ServiceDescriptor, ServiceOutcome,
};
use std::time::Duration;

/// One AI provider behind a uniform `ask` contract.
///
/// Implementations never return an error: every failure (missing key, transport,
/// provider status, timeout) is folded into `ServiceOutcome::Failure`. Exactly one
/// request is issued per call; no internal retries.
#[async_trait::async_trait]
pub trait AiServicePort: Send + Sync {
    /// Stable id, label and icon for this service.
    fn descriptor(&self) -> &ServiceDescriptor;

    /// True when a credential is present. Unconfigured adapters answer without network I/O.
    fn is_configured(&self) -> bool;

    /// Send `message` to the provider, giving up after `timeout`.
    async fn ask(&self, message: &str, timeout: Duration) -> ServiceOutcome;
}

/// Chat platform client. Send, edit and delete bot messages; pull updates.
#[async_trait::async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send a text message. `parse_mode = None` sends plain text.
    /// `reply_to` quotes the user's message when set.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
        reply_to: Option<i64>,
    ) -> Result<SentMessage, DomainError>;

    /// Replace the text of a message the bot sent earlier.
    async fn edit_message_text(
        &self,
        message: SentMessage,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), DomainError>;

    async fn delete_message(&self, message: SentMessage) -> Result<(), DomainError>;

    /// Long-poll for updates with `update_id >= offset`. Blocks up to `timeout_secs` on the server side.
    async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<ChatUpdate>, DomainError>;

    /// Register `url` as the webhook target. Updates then stop flowing through `get_updates`.
    async fn set_webhook(&self, url: &str) -> Result<(), DomainError>;

    async fn delete_webhook(&self) -> Result<(), DomainError>;

    /// Bot username. Used at startup to verify the token.
    async fn get_me(&self) -> Result<String, DomainError>;
}
