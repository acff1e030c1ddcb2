//! Parsing and normalization of the two-reply response format.
//!
//! The persona instructs the model to answer every prompt with two labeled
//! alternatives in a single response string. This module extracts the pair
//! and repairs responses that ignored the instruction. Parsing never fails:
//! malformed input degrades to "whole text is the primary reply".

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Literal label preceding the first alternative reply.
pub const REPLY_ONE_MARKER: &str = "Reply 1:";
/// Literal label preceding the second alternative reply.
pub const REPLY_TWO_MARKER: &str = "Reply 2:";

/// The two alternative replies extracted from one model response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DualReply {
    pub primary: String,
    pub secondary: String,
}

impl DualReply {
    /// Split a response string into its two labeled alternatives.
    ///
    /// The split point is the first occurrence of the second marker; the
    /// primary reply is the text between the first marker and that point,
    /// the secondary reply everything after it. Missing or out-of-order
    /// markers degrade to the whole string as the primary reply.
    pub fn parse(response: &str) -> Self {
        if let Some((head, tail)) = response.split_once(REPLY_TWO_MARKER) {
            if let Some((_, primary)) = head.split_once(REPLY_ONE_MARKER) {
                return Self {
                    primary: primary.trim().to_string(),
                    secondary: tail.trim().to_string(),
                };
            }
        }
        debug!("response missing reply markers, using full text as primary");
        Self {
            primary: response.trim().to_string(),
            secondary: String::new(),
        }
    }
}

/// Repair a response that lacks the two-reply markers by templating a second
/// alternative around the raw text. Responses that already carry both
/// markers pass through unchanged.
pub fn ensure_two_reply_format(text: &str) -> String {
    if text.contains(REPLY_ONE_MARKER) && text.contains(REPLY_TWO_MARKER) {
        text.to_string()
    } else {
        format!("{REPLY_ONE_MARKER} {text} {REPLY_TWO_MARKER} Alternative response.")
    }
}

/// A normalized model response: the marker-formatted text plus its parsed
/// alternatives. Produced by the model router for every generation, whether
/// the call succeeded or degraded to the synthetic failure reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplyDraft {
    /// Normalized response text, markers included.
    pub text: String,
    pub replies: DualReply,
}

impl ReplyDraft {
    /// Normalize a raw model response and parse out the alternatives.
    pub fn from_raw(raw: &str) -> Self {
        let text = ensure_two_reply_format(raw.trim());
        let replies = DualReply::parse(&text);
        Self { text, replies }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_markers() {
        let parsed = DualReply::parse("Reply 1: Hello Reply 2: Hi there");
        assert_eq!(parsed.primary, "Hello");
        assert_eq!(parsed.secondary, "Hi there");
    }

    #[test]
    fn test_parse_no_markers_returns_whole_text() {
        let parsed = DualReply::parse("Just a plain answer");
        assert_eq!(parsed.primary, "Just a plain answer");
        assert_eq!(parsed.secondary, "");
    }

    #[test]
    fn test_parse_missing_second_marker() {
        let parsed = DualReply::parse("Reply 1: only one option here");
        assert_eq!(parsed.primary, "Reply 1: only one option here");
        assert_eq!(parsed.secondary, "");
    }

    #[test]
    fn test_parse_missing_first_marker() {
        let parsed = DualReply::parse("something Reply 2: second half");
        assert_eq!(parsed.primary, "something Reply 2: second half");
        assert_eq!(parsed.secondary, "");
    }

    #[test]
    fn test_parse_splits_on_first_second_marker() {
        let parsed = DualReply::parse("Reply 1: a Reply 2: b Reply 2: c");
        assert_eq!(parsed.primary, "a");
        assert_eq!(parsed.secondary, "b Reply 2: c");
    }

    #[test]
    fn test_parse_multiline_replies() {
        let text = "Reply 1: How are you?\nHope the week is going well.\nReply 2: Long time no talk!";
        let parsed = DualReply::parse(text);
        assert_eq!(parsed.primary, "How are you?\nHope the week is going well.");
        assert_eq!(parsed.secondary, "Long time no talk!");
    }

    #[test]
    fn test_parse_reconstructs_content_ordering() {
        let original = "Reply 1: first option Reply 2: second option";
        let parsed = DualReply::parse(original);
        let rebuilt = format!(
            "{REPLY_ONE_MARKER} {} {REPLY_TWO_MARKER} {}",
            parsed.primary, parsed.secondary
        );
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_ensure_format_passes_marked_text_through() {
        let text = "Reply 1: a Reply 2: b";
        assert_eq!(ensure_two_reply_format(text), text);
    }

    #[test]
    fn test_ensure_format_wraps_plain_text() {
        let fixed = ensure_two_reply_format("Just a plain answer");
        assert_eq!(
            fixed,
            "Reply 1: Just a plain answer Reply 2: Alternative response."
        );
        let parsed = DualReply::parse(&fixed);
        assert_eq!(parsed.primary, "Just a plain answer");
        assert_eq!(parsed.secondary, "Alternative response.");
    }

    #[test]
    fn test_draft_from_raw_plain_text() {
        let draft = ReplyDraft::from_raw("  Just a plain answer \n");
        assert_eq!(draft.replies.primary, "Just a plain answer");
        assert_eq!(draft.replies.secondary, "Alternative response.");
        assert!(draft.text.starts_with(REPLY_ONE_MARKER));
    }
}
