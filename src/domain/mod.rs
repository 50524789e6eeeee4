//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod status;

pub use entities::{
    ChatUpdate, InboundMessage, OutcomeMap, ParseMode, SentMessage, ServiceDescriptor, ServiceOutcome,
};
pub use errors::{AdapterFailure, DomainError};
pub use status::BotStatus;
