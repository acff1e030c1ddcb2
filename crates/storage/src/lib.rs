//! Storage layer for replydesk
//!
//! Conversation transcripts live in an external spreadsheet, one sheet tab
//! per client, one row per turn. This crate wraps that REST surface in typed
//! clients, exposes the `ConversationStore` trait with spreadsheet and
//! in-memory backends, and handles per-client document export.

mod backend;
mod docs;
mod error;
mod memory;
mod rows;
mod sheets;
mod sheets_store;
mod store;

pub use backend::StoreBackend;
pub use docs::{DocsClient, DocumentExporter, ExportReceipt};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use rows::{HEADER_ROW, turn_from_row, turn_to_row};
pub use sheets::SheetsClient;
pub use sheets_store::SheetsStore;
pub use store::ConversationStore;
