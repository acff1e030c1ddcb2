use tracing::warn;

use replydesk_core::ChatMessage;

use crate::openai::OpenAiProvider;

/// Messages at or below this length pass through unsummarized.
pub const SUMMARY_THRESHOLD: usize = 100;
const SUMMARY_MAX_TOKENS: u32 = 60;
const SUMMARY_TEMPERATURE: f32 = 0.3;
const SUMMARY_INSTRUCTION: &str =
    "Summarize the following message in one or two short sentences.";

/// Produces the short per-turn summary stored alongside each reply.
///
/// Uses the chat-completions endpoint with its own fixed parameters; when no
/// provider is configured or the call fails, degrades to truncation. Never
/// returns an error.
#[derive(Debug)]
pub struct Summarizer {
    provider: Option<OpenAiProvider>,
}

impl Summarizer {
    pub fn new(provider: Option<OpenAiProvider>) -> Self {
        Self { provider }
    }

    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub async fn summarize(&self, text: &str) -> String {
        if text.chars().count() <= SUMMARY_THRESHOLD {
            return text.to_owned();
        }

        let Some(provider) = &self.provider else {
            return truncated(text);
        };

        let messages = [ChatMessage::user(text)];
        match provider
            .complete_with(SUMMARY_INSTRUCTION, &messages, SUMMARY_TEMPERATURE, SUMMARY_MAX_TOKENS)
            .await
        {
            Ok(summary) if !summary.trim().is_empty() => summary.trim().to_owned(),
            Ok(_) => truncated(text),
            Err(e) => {
                warn!(error = %e, "summary call failed, falling back to truncation");
                truncated(text)
            },
        }
    }
}

fn truncated(text: &str) -> String {
    let head: String = text.chars().take(SUMMARY_THRESHOLD).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_short_text_passes_through() {
        let summarizer = Summarizer::disabled();
        assert_eq!(summarizer.summarize("short message").await, "short message");
    }

    #[tokio::test]
    async fn test_long_text_truncates_without_provider() {
        let summarizer = Summarizer::disabled();
        let long = "x".repeat(250);
        let summary = summarizer.summarize(&long).await;
        assert_eq!(summary.chars().count(), SUMMARY_THRESHOLD + 3);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_truncated_respects_char_boundaries() {
        let long = "é".repeat(150);
        let summary = truncated(&long);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), SUMMARY_THRESHOLD + 3);
    }
}
