//! Service layer for replydesk
//!
//! Centralizes chat orchestration between the CLI/HTTP front ends and the
//! store, router, summarizer, and exporter.

mod chat_service;
pub mod context;
mod error;
mod session;

pub use chat_service::{ChatService, DEFAULT_HISTORY_LIMIT, Greeting, SavedReply, TurnOutcome};
pub use error::ServiceError;
pub use session::ChatSession;
