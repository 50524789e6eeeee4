//! Application use cases. Orchestrate domain logic via ports.

pub mod chat_handler;
pub mod fan_out;
pub mod formatter;
pub mod polling_service;
pub mod status_service;

pub use chat_handler::{ChatHandler, HandlerState};
pub use fan_out::FanOutService;
pub use formatter::{FormatLimits, ResponseFormatter};
pub use polling_service::PollingService;
pub use status_service::{StatusReport, StatusService};
