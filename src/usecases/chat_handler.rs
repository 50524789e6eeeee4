//! Chat message handler: one inbound message in, one reply out.
//!
//! `Idle -> Processing -> Delivered | DeliveryFailed`. Processing is the span of
//! `handle_message` between the placeholder and the last send; only the end state
//! is returned. The reply goes through an ordered list of delivery strategies;
//! the first one that sends wins.

use crate::domain::{ChatUpdate, DomainError, InboundMessage, ParseMode, SentMessage};
use crate::ports::{ChatGateway, UpdateSink};
use crate::usecases::fan_out::FanOutService;
use crate::usecases::formatter::{ResponseFormatter, escape_html, to_plain_text};
use crate::usecases::status_service::StatusService;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const PLACEHOLDER_TEXT: &str =
    "🔄 Processing your message through all AI services...\nThis may take a few seconds.";
pub const MINIMAL_NOTICE: &str =
    "I received your message but had trouble sending the full response. Please try again.";
pub const ERROR_NOTICE: &str =
    "❌ Sorry, there was an error processing your message. Please try again.";
pub const PLAIN_ERROR_NOTICE: &str = "❌ Error occurred. Please try again.";

/// Where one message ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    /// Nothing to do (no text content).
    Idle,
    Delivered,
    /// Every delivery strategy failed. Logged, never raised.
    DeliveryFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeliveryStrategy {
    /// Remove the placeholder, send the HTML reply.
    Rich,
    /// Same reply with the markup stripped.
    Plain,
    MinimalNotice,
}

const DELIVERY_CHAIN: [DeliveryStrategy; 3] = [
    DeliveryStrategy::Rich,
    DeliveryStrategy::Plain,
    DeliveryStrategy::MinimalNotice,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Help,
    Status,
}

impl Command {
    /// `/start`, `/help@my_bot`, ... Anything else is ordinary text.
    fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

pub struct ChatHandler {
    gateway: Arc<dyn ChatGateway>,
    fan_out: Arc<FanOutService>,
    status: Arc<StatusService>,
    formatter: ResponseFormatter,
    /// Per-service timeout used for chat messages.
    aggregate_timeout: Duration,
}

impl ChatHandler {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        fan_out: Arc<FanOutService>,
        status: Arc<StatusService>,
        formatter: ResponseFormatter,
        aggregate_timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            fan_out,
            status,
            formatter,
            aggregate_timeout,
        }
    }

    /// Run one message through the state machine and return the terminal state.
    pub async fn handle_message(&self, message: InboundMessage) -> HandlerState {
        let Some(text) = message.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            debug!(chat_id = message.chat_id, "message without text; ignored");
            return HandlerState::Idle;
        };

        if let Some(command) = Command::parse(text) {
            return self.handle_command(command, &message).await;
        }

        info!(
            chat_id = message.chat_id,
            from = message.from_name.as_deref().unwrap_or("User"),
            text_len = text.chars().count(),
            "received message"
        );

        // Processing. The placeholder is best-effort.
        let placeholder = match self
            .gateway
            .send_message(message.chat_id, PLACEHOLDER_TEXT, None, Some(message.message_id))
            .await
        {
            Ok(sent) => Some(sent),
            Err(e) => {
                warn!(chat_id = message.chat_id, error = %e, "placeholder not sent; continuing");
                None
            }
        };

        let fan_out = Arc::clone(&self.fan_out);
        let query = text.to_string();
        let timeout = self.aggregate_timeout;
        let aggregation =
            tokio::spawn(async move { fan_out.query_all(&query, timeout).await }).await;

        match aggregation {
            Ok(outcomes) => {
                self.status.record_outcomes(&outcomes).await;
                let reply = self.formatter.format(&outcomes);
                self.deliver(&message, placeholder, &reply).await
            }
            Err(join_err) => {
                error!(chat_id = message.chat_id, error = %join_err, "aggregation failed");
                self.report_fault(message.chat_id, placeholder).await
            }
        }
    }

    async fn handle_command(&self, command: Command, message: &InboundMessage) -> HandlerState {
        info!(chat_id = message.chat_id, ?command, "command");
        let reply = match command {
            Command::Start => self.welcome_text(message.from_name.as_deref()),
            Command::Help => self.help_text(),
            Command::Status => self.status_text().await,
        };
        self.deliver(message, None, &reply).await
    }

    /// Walk the delivery chain until one strategy sends.
    async fn deliver(
        &self,
        message: &InboundMessage,
        placeholder: Option<SentMessage>,
        html: &str,
    ) -> HandlerState {
        for strategy in DELIVERY_CHAIN {
            match self.attempt(strategy, message, placeholder, html).await {
                Ok(sent) => {
                    info!(
                        chat_id = sent.chat_id,
                        message_id = sent.message_id,
                        ?strategy,
                        "reply delivered"
                    );
                    return HandlerState::Delivered;
                }
                Err(e) => {
                    warn!(chat_id = message.chat_id, ?strategy, error = %e, "delivery attempt failed")
                }
            }
        }
        error!(chat_id = message.chat_id, "all delivery strategies failed");
        HandlerState::DeliveryFailed
    }

    async fn attempt(
        &self,
        strategy: DeliveryStrategy,
        message: &InboundMessage,
        placeholder: Option<SentMessage>,
        html: &str,
    ) -> Result<SentMessage, DomainError> {
        let chat_id = message.chat_id;
        let reply_to = Some(message.message_id);
        match strategy {
            DeliveryStrategy::Rich => {
                if let Some(placeholder) = placeholder {
                    if let Err(e) = self.gateway.delete_message(placeholder).await {
                        debug!(chat_id, error = %e, "placeholder not deleted");
                    }
                }
                self.gateway
                    .send_message(chat_id, html, Some(ParseMode::Html), reply_to)
                    .await
            }
            DeliveryStrategy::Plain => {
                self.gateway
                    .send_message(chat_id, &to_plain_text(html), None, reply_to)
                    .await
            }
            DeliveryStrategy::MinimalNotice => {
                self.gateway
                    .send_message(chat_id, MINIMAL_NOTICE, None, None)
                    .await
            }
        }
    }

    /// Turn the placeholder into an error notice, or send one if that fails.
    async fn report_fault(&self, chat_id: i64, placeholder: Option<SentMessage>) -> HandlerState {
        if let Some(placeholder) = placeholder {
            match self
                .gateway
                .edit_message_text(placeholder, ERROR_NOTICE, None)
                .await
            {
                Ok(()) => return HandlerState::Delivered,
                Err(e) => warn!(chat_id, error = %e, "could not edit placeholder into error notice"),
            }
        }
        match self
            .gateway
            .send_message(chat_id, PLAIN_ERROR_NOTICE, None, None)
            .await
        {
            Ok(_) => HandlerState::Delivered,
            Err(e) => {
                error!(chat_id, error = %e, "error notice not delivered");
                HandlerState::DeliveryFailed
            }
        }
    }

    fn welcome_text(&self, from_name: Option<&str>) -> String {
        let services = self.fan_out.descriptors();
        let mut out = format!(
            "🤖 <b>Welcome to the Multi-AI Assistant Bot!</b>\n\nHi {}! I'm powered by {} AI services working together:\n",
            escape_html(from_name.unwrap_or("there")),
            services.len()
        );
        for service in &services {
            out.push_str(&format!("• {} {}\n", service.icon, escape_html(&service.label)));
        }
        out.push_str(
            "\nJust send me any message and I'll get responses from all of them!\n\n\
             Commands:\n\
             /start - Show this welcome message\n\
             /help - Show help information\n\
             /status - Check bot status",
        );
        out
    }

    fn help_text(&self) -> String {
        let mut out = String::from(
            "🆘 <b>Help - Multi-AI Assistant Bot</b>\n\n\
             How to use:\n\
             1. Simply send any text message\n\
             2. The bot will query every AI service simultaneously\n\
             3. You'll receive responses from:\n",
        );
        for service in self.fan_out.descriptors() {
            out.push_str(&format!("   • {}\n", escape_html(&service.label)));
        }
        out.push_str(
            "\nCommands:\n\
             /start - Welcome message\n\
             /help - This message\n\
             /status - Check bot and services status\n\n\
             Just start chatting - I'm here to help!",
        );
        out
    }

    async fn status_text(&self) -> String {
        let report = self.status.check().await;
        let last_check = report
            .last_check
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "N/A".to_string());

        let mut out = format!(
            "🤖 <b>Bot Status</b>\n\n• <b>Uptime:</b> {}\n• <b>Last check:</b> {}\n\n<b>Services Status</b>\n",
            report.uptime, last_check
        );
        for service in self.fan_out.descriptors() {
            let healthy = report.services.get(&service.id).copied().unwrap_or(false);
            out.push_str(&format!(
                "• {} {}: {}\n",
                service.icon,
                escape_html(&service.label),
                if healthy { "✅ Working" } else { "❌ Not working" }
            ));
        }
        out.push_str("\n✨ <i>Send any message to test the services</i>");
        out
    }
}

#[async_trait::async_trait]
impl UpdateSink for ChatHandler {
    async fn handle_update(&self, update: ChatUpdate) -> Result<(), DomainError> {
        match update.message {
            Some(message) => {
                let state = self.handle_message(message).await;
                debug!(update_id = update.update_id, ?state, "update handled");
            }
            None => debug!(update_id = update.update_id, "update without message; skipped"),
        }
        Ok(())
    }
}
