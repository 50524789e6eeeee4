//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Chat gateway error: {0}")]
    ChatGateway(String),

    #[error("Malformed update: {0}")]
    Update(String),
}

/// Why a single adapter call did not produce a reply.
///
/// Recovered inside the adapter (or the aggregator) and carried as a
/// `ServiceOutcome::Failure`; never raised further. `Display` is the text the
/// user sees in the formatted reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterFailure {
    /// No credential for the service. `service` is the display name, e.g. "Gemini".
    #[error("{service} API key not configured")]
    NotConfigured { service: String },

    /// Request could not be sent or the body could not be read/decoded.
    #[error("API error: {0}")]
    Transport(String),

    /// Provider answered with a non-success status.
    #[error("API error {status}")]
    Provider { status: u16, detail: String },

    #[error("Request timeout")]
    Timeout,

    /// The call itself panicked or was torn down.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdapterFailure {
    pub fn not_configured(service: impl Into<String>) -> Self {
        Self::NotConfigured {
            service: service.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_texts() {
        assert_eq!(
            AdapterFailure::not_configured("Gemini").to_string(),
            "Gemini API key not configured"
        );
        assert_eq!(AdapterFailure::Timeout.to_string(), "Request timeout");
        assert_eq!(
            AdapterFailure::Transport("connection refused".into()).to_string(),
            "API error: connection refused"
        );
        assert_eq!(
            AdapterFailure::Provider {
                status: 503,
                detail: "overloaded".into()
            }
            .to_string(),
            "API error 503"
        );
    }
}
