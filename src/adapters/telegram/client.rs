//! Implements ChatGateway over the Telegram Bot API (HTTPS + JSON).
//!
//! The bot token is part of every URL; errors are stripped of their URL before
//! they are logged or returned.

use crate::adapters::telegram::mapper;
use crate::adapters::telegram::types::{ApiResponse, Message, Update, User};
use crate::domain::{ChatUpdate, DomainError, ParseMode, SentMessage};
use crate::ports::ChatGateway;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Extra time on top of the long-poll window before the HTTP call is abandoned.
const POLL_GRACE: Duration = Duration::from_secs(10);

pub struct BotApiGateway {
    client: reqwest::Client,
    /// `{api_url}/bot{token}`
    base: String,
}

impl BotApiGateway {
    /// # Arguments
    /// * `api_url` - Bot API root (e.g., "https://api.telegram.org")
    /// * `token` - Bot token from @BotFather
    pub fn new(client: reqwest::Client, api_url: &str, token: &str) -> Self {
        Self {
            client,
            base: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    async fn call<B, T>(
        &self,
        method: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<T, DomainError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .post(format!("{}/{}", self.base, method))
            .json(body);
        if let Some(t) = timeout {
            request = request.timeout(t);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::ChatGateway(format!("{}: {}", method, e.without_url())))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            DomainError::ChatGateway(format!("{}: HTTP {}: {}", method, status, e.without_url()))
        })?;

        if !envelope.ok {
            return Err(DomainError::ChatGateway(format!(
                "{} failed ({}): {}",
                method,
                envelope.error_code.unwrap_or(status.as_u16() as i64),
                envelope.description.unwrap_or_else(|| "no description".to_string())
            )));
        }

        debug!(method, "Bot API call ok");
        envelope
            .result
            .ok_or_else(|| DomainError::ChatGateway(format!("{}: empty result", method)))
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_parameters: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct EditMessageRequest<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[async_trait]
impl ChatGateway for BotApiGateway {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
        reply_to: Option<i64>,
    ) -> Result<SentMessage, DomainError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode: parse_mode.map(|m| m.as_str()),
            reply_parameters: reply_to.map(|id| {
                json!({"message_id": id, "allow_sending_without_reply": true})
            }),
        };
        let sent: Message = self.call("sendMessage", &body, None).await?;
        Ok(SentMessage {
            chat_id: sent.chat.id,
            message_id: sent.message_id,
        })
    }

    async fn edit_message_text(
        &self,
        message: SentMessage,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), DomainError> {
        let body = EditMessageRequest {
            chat_id: message.chat_id,
            message_id: message.message_id,
            text,
            parse_mode: parse_mode.map(|m| m.as_str()),
        };
        // Result is the edited Message (or `true` for inline messages); only success matters.
        let _: serde_json::Value = self.call("editMessageText", &body, None).await?;
        Ok(())
    }

    async fn delete_message(&self, message: SentMessage) -> Result<(), DomainError> {
        let body = json!({"chat_id": message.chat_id, "message_id": message.message_id});
        let _: bool = self.call("deleteMessage", &body, None).await?;
        Ok(())
    }

    async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<ChatUpdate>, DomainError> {
        let body = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &body,
                Some(Duration::from_secs(timeout_secs) + POLL_GRACE),
            )
            .await?;
        Ok(updates.into_iter().map(mapper::update_to_domain).collect())
    }

    async fn set_webhook(&self, url: &str) -> Result<(), DomainError> {
        let body = json!({"url": url, "allowed_updates": ["message"]});
        let _: bool = self.call("setWebhook", &body, None).await?;
        Ok(())
    }

    async fn delete_webhook(&self) -> Result<(), DomainError> {
        let _: bool = self.call("deleteWebhook", &json!({}), None).await?;
        Ok(())
    }

    async fn get_me(&self) -> Result<String, DomainError> {
        let me: User = self.call("getMe", &json!({}), None).await?;
        Ok(me.username.unwrap_or(me.first_name))
    }
}
