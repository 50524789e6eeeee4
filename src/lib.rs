//! multi-ai-bot: Telegram bot that fans every message out to several AI services
//! and replies with all answers at once. Hexagonal layout.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
