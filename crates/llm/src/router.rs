use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use replydesk_core::{ChatMessage, REPLY_ONE_MARKER, REPLY_TWO_MARKER, ReplyDraft};

use crate::anthropic::AnthropicProvider;
use crate::error::LlmError;
use crate::openai::OpenAiProvider;
use crate::provider::ChatProvider;
use crate::retry::RetryPolicy;

/// Provider selector carried by a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    #[serde(alias = "anthropic")]
    Claude,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Claude => "claude",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "claude" | "anthropic" => Ok(Self::Claude),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// Dispatches prompts to the selected provider and normalizes every outcome
/// to a two-reply draft.
///
/// `generate` never fails: transport and provider errors are retried per the
/// policy and, when exhausted, degrade to a synthetic two-reply error
/// draft embedding the last error text. Unconfigured providers short-circuit
/// to the same degraded draft without a network call.
#[derive(Debug)]
pub struct ModelRouter {
    openai: Option<OpenAiProvider>,
    anthropic: Option<AnthropicProvider>,
    retry: RetryPolicy,
}

impl ModelRouter {
    pub fn new(
        openai: Option<OpenAiProvider>,
        anthropic: Option<AnthropicProvider>,
        retry: RetryPolicy,
    ) -> Self {
        Self { openai, anthropic, retry }
    }

    pub fn has_provider(&self, kind: ProviderKind) -> bool {
        self.provider(kind).is_some()
    }

    fn provider(&self, kind: ProviderKind) -> Option<&dyn ChatProvider> {
        match kind {
            ProviderKind::OpenAi => self.openai.as_ref().map(|p| p as &dyn ChatProvider),
            ProviderKind::Claude => self.anthropic.as_ref().map(|p| p as &dyn ChatProvider),
        }
    }

    /// Generate a two-reply draft for the given persona and message list.
    pub async fn generate(
        &self,
        kind: ProviderKind,
        persona_text: &str,
        messages: &[ChatMessage],
    ) -> ReplyDraft {
        let Some(provider) = self.provider(kind) else {
            warn!(provider = kind.as_str(), "provider not configured, degrading to error reply");
            return failure_draft(&LlmError::NotConfigured(kind.as_str().to_owned()));
        };

        let mut last_error = LlmError::EmptyResponse;
        for attempt in 1..=self.retry.max_attempts() {
            if let Some(delay) = self.retry.delay_before(attempt) {
                warn!(
                    provider = provider.name(),
                    attempt,
                    ?delay,
                    "retrying model call"
                );
                tokio::time::sleep(delay).await;
            }

            match provider.complete(persona_text, messages).await {
                Ok(raw) => return ReplyDraft::from_raw(&raw),
                Err(e) => {
                    warn!(provider = provider.name(), attempt, error = %e, "model call failed");
                    let transient = e.is_transient();
                    last_error = e;
                    if !transient {
                        break;
                    }
                },
            }
        }

        error!(provider = provider.name(), error = %last_error, "model call gave up");
        failure_draft(&last_error)
    }
}

/// The synthetic two-reply error response shown in place of a model reply.
fn failure_draft(err: &LlmError) -> ReplyDraft {
    let text = format!(
        "{REPLY_ONE_MARKER} I encountered an error. Please try again. \
         {REPLY_TWO_MARKER} Technical issue: {err}"
    );
    ReplyDraft::from_raw(&text)
}
