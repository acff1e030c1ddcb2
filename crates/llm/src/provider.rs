use async_trait::async_trait;
use replydesk_core::ChatMessage;

use crate::error::LlmError;

/// A hosted chat-completion back end.
///
/// Implementations hold their fixed model identifier and generation
/// parameters; callers supply only the persona text (sent as the system
/// prompt) and the ordered message list. One call, one response; retry is
/// the router's job.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logs and error text.
    fn name(&self) -> &'static str;

    /// Send one completion request and return the raw response text.
    async fn complete(&self, system: &str, messages: &[ChatMessage])
    -> Result<String, LlmError>;
}

/// Truncates a string to the given maximum length at a char boundary.
pub(crate) fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
