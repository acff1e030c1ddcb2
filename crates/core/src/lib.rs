//! Core domain types for replydesk
//!
//! This crate contains the types shared across all other crates: conversation
//! turns, chat messages, the dual-reply parser, and persona definitions.

mod env;
mod message;
mod persona;
mod reply;
mod turn;

pub use env::*;
pub use message::*;
pub use persona::*;
pub use reply::*;
pub use turn::*;
