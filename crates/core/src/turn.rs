use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::reply::ReplyDraft;

/// Timestamp format used in persisted rows and document separators.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One conversation exchange: a user message plus the assistant reply and
/// its derived fields.
///
/// A turn is created when the user sends a message (reply fields empty) and
/// mutated in place once the model responds, on retry, and when the operator
/// saves an edited reply. The `id` is the correlation key that locates the
/// turn's row in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub id: String,
    pub timestamp: String,
    pub client: String,
    pub message: String,
    pub reply_primary: String,
    pub reply_secondary: String,
    pub final_reply: String,
    pub summary: String,
}

impl Turn {
    /// Create a turn for a freshly sent user message. Reply fields stay
    /// empty until the model responds.
    pub fn new(client: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            client: client.into(),
            message: message.into(),
            reply_primary: String::new(),
            reply_secondary: String::new(),
            final_reply: String::new(),
            summary: String::new(),
        }
    }

    /// Fill the reply fields from a generated draft. The raw normalized text
    /// becomes the final reply until the operator overrides it.
    pub fn fill_reply(&mut self, draft: &ReplyDraft, summary: impl Into<String>) {
        self.reply_primary = draft.replies.primary.clone();
        self.reply_secondary = draft.replies.secondary.clone();
        self.final_reply = draft.text.clone();
        self.summary = summary.into();
    }

    /// The text an assistant line in the prompt context should use:
    /// the final reply if present, otherwise the first alternative.
    pub fn assistant_text(&self) -> Option<&str> {
        if !self.final_reply.is_empty() {
            Some(&self.final_reply)
        } else if !self.reply_primary.is_empty() {
            Some(&self.reply_primary)
        } else {
            None
        }
    }

    pub fn has_reply(&self) -> bool {
        self.assistant_text().is_some()
    }
}
