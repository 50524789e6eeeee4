//! Infrastructure adapters. Implement outbound ports, expose inbound ones.
//!
//! AI providers, Telegram Bot API, HTTP surface. Map errors to DomainError or AdapterFailure.

pub mod ai;
pub mod http;
pub mod telegram;

#[cfg(test)]
pub mod test_server;
