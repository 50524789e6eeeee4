//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by webhook/polling adapters into the application
//! - Outbound: Called by application into infrastructure

pub mod inbound;
pub mod outbound;

pub use inbound::UpdateSink;
pub use outbound::{AiServicePort, ChatGateway};
