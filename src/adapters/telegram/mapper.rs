//! Map Bot API types to domain entities.

use crate::adapters::telegram::types::{Message, Update};
use crate::domain::{ChatUpdate, DomainError, InboundMessage};

/// Map a Bot API `Update`. Non-message updates (edits, callbacks, ...) keep
/// their id but carry no message.
pub fn update_to_domain(update: Update) -> ChatUpdate {
    ChatUpdate {
        update_id: update.update_id,
        message: update.message.map(message_to_domain),
    }
}

pub fn message_to_domain(msg: Message) -> InboundMessage {
    InboundMessage {
        chat_id: msg.chat.id,
        message_id: msg.message_id,
        text: msg.text.filter(|t| !t.trim().is_empty()),
        from_name: msg.from.map(|u| u.first_name),
    }
}

/// Parse a raw webhook payload.
pub fn parse_update(payload: serde_json::Value) -> Result<ChatUpdate, DomainError> {
    let update: Update =
        serde_json::from_value(payload).map_err(|e| DomainError::Update(e.to_string()))?;
    Ok(update_to_domain(update))
}
