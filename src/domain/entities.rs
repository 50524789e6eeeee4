//! Domain entities. Pure data structures for the core business.
//!
//! No Telegram/HTTP types here — these are mapped from adapters.

use crate::domain::errors::AdapterFailure;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Result of one adapter call for one message. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceOutcome {
    Success { text: String },
    Failure { reason: String },
}

impl ServiceOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<AdapterFailure> for ServiceOutcome {
    fn from(failure: AdapterFailure) -> Self {
        Self::failure(failure.to_string())
    }
}

/// Wire shape used by the monitoring endpoints:
/// `{"success": true, "response": ..}` or `{"success": false, "error": ..}`.
impl Serialize for ServiceOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ServiceOutcome", 2)?;
        match self {
            Self::Success { text } => {
                s.serialize_field("success", &true)?;
                s.serialize_field("response", text)?;
            }
            Self::Failure { reason } => {
                s.serialize_field("success", &false)?;
                s.serialize_field("error", reason)?;
            }
        }
        s.end()
    }
}

/// Service id -> outcome. Built fresh per message, one entry per configured adapter.
pub type OutcomeMap = BTreeMap<String, ServiceOutcome>;

/// Static description of one AI service: stable key plus how it is shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Stable key used in `OutcomeMap` and the JSON endpoints (e.g. "gemini").
    pub id: String,
    /// Short provider name used in error texts (e.g. "Gemini").
    pub name: String,
    /// Section heading in the formatted reply (e.g. "Gemini AI").
    pub label: String,
    pub icon: String,
}

impl ServiceDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: label.into(),
            icon: icon.into(),
        }
    }

    pub fn gemini() -> Self {
        Self::new("gemini", "Gemini", "Gemini AI", "🔷")
    }

    pub fn together() -> Self {
        Self::new("together", "Together", "Together.ai", "🟠")
    }
}

/// An inbound chat message, mapped from the platform update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub message_id: i64,
    /// `None` for stickers, photos and other non-text content.
    pub text: Option<String>,
    pub from_name: Option<String>,
}

/// One platform update. Only message updates carry a payload we act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUpdate {
    pub update_id: i64,
    pub message: Option<InboundMessage>,
}

/// Handle to a message the bot has sent (used to edit or delete it later).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message_id: i64,
}

/// Rich-text mode for outgoing messages. `None` at call sites means plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Html,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_shape() {
        let ok = serde_json::to_value(ServiceOutcome::success("Hi there")).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "response": "Hi there"}));

        let err = serde_json::to_value(ServiceOutcome::from(AdapterFailure::Timeout)).unwrap();
        assert_eq!(
            err,
            serde_json::json!({"success": false, "error": "Request timeout"})
        );
    }
}
