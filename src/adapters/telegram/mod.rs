//! Telegram Bot API adapter. Implements ChatGateway and maps wire updates.

pub mod client;
pub mod mapper;
pub mod types;

pub use client::BotApiGateway;
