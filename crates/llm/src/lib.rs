//! LLM provider integration for replydesk
//!
//! Two interchangeable chat-completion back ends behind one trait, a router
//! that retries per an explicit backoff policy and normalizes every response
//! to the two-reply format, and a summarizer for transcript rows.

mod anthropic;
mod error;
mod openai;
mod provider;
mod retry;
mod router;
mod summary;


pub use anthropic::{ANTHROPIC_MODEL, AnthropicProvider};
pub use error::LlmError;
pub use openai::{OPENAI_MODEL, OpenAiProvider};
pub use provider::ChatProvider;
pub use retry::RetryPolicy;
pub use router::{ModelRouter, ProviderKind};
pub use summary::{SUMMARY_THRESHOLD, Summarizer};
