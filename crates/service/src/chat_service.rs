//! Chat orchestration: sessions, turns, retries, and saved replies.

use std::path::Path;
use std::sync::Arc;

use replydesk_core::{Persona, PersonaError, Turn};
use replydesk_llm::{ModelRouter, ProviderKind, Summarizer};
use replydesk_storage::{ConversationStore, DocumentExporter, ExportReceipt, StoreBackend};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context;
use crate::error::ServiceError;
use crate::session::ChatSession;

/// Turns of history handed to the model per request, unless overridden.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Synthetic two-reply greeting shown when a session starts. Greetings are
/// presentation only and are never persisted as turns.
#[derive(Debug, Clone, Serialize)]
pub struct Greeting {
    pub text: String,
    /// Whether this session created the client's conversation record.
    pub new_client: bool,
}

/// Result of sending or retrying a message.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub turn: Turn,
    /// `true` when the in-place row update missed and the filled turn was
    /// appended as a new row instead.
    pub appended_fallback: bool,
}

/// Result of saving a chosen reply to the client's export document.
#[derive(Debug, Clone, Serialize)]
pub struct SavedReply {
    pub turn: Turn,
    pub receipt: ExportReceipt,
}

/// Composes the store backend, the model router, the summarizer, and an
/// optional document exporter behind one interface shared by the CLI and
/// the HTTP API.
pub struct ChatService {
    store: Arc<StoreBackend>,
    router: ModelRouter,
    summarizer: Summarizer,
    exporter: Option<DocumentExporter>,
    history_limit: usize,
    persona: Persona,
}

impl ChatService {
    #[must_use]
    pub fn new(store: Arc<StoreBackend>, router: ModelRouter, summarizer: Summarizer) -> Self {
        Self {
            store,
            router,
            summarizer,
            exporter: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            persona: Persona::default(),
        }
    }

    #[must_use]
    pub fn with_exporter(mut self, exporter: DocumentExporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Replace the persona new sessions start with.
    #[must_use]
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    pub fn store(&self) -> &StoreBackend {
        &self.store
    }

    /// The persona new sessions start with.
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn has_exporter(&self) -> bool {
        self.exporter.is_some()
    }

    /// Ensure the client's conversation record exists and open a session.
    /// The greeting distinguishes a brand-new client from a returning one.
    pub async fn start_session(
        &self,
        client: &str,
        provider: ProviderKind,
    ) -> (ChatSession, Greeting) {
        let returning = self.store.partition_exists(client).await;
        if !returning {
            self.store.create_partition(client).await;
        }
        let mut session = ChatSession::new(client, provider);
        session.set_persona(self.persona.clone());
        info!(
            client,
            session_id = %session.id,
            provider = provider.as_str(),
            returning,
            "session started"
        );
        let greeting = Greeting {
            text: greeting_text(client, !returning),
            new_client: !returning,
        };
        (session, greeting)
    }

    /// Run one full turn: append the user message, generate the two-reply
    /// draft, summarize it, and write the filled turn back to its row.
    ///
    /// Never errors. Router and summarizer failures degrade to sentinel
    /// text inside the turn; store failures are logged at the adapter
    /// boundary and the returned turn still carries the generated reply.
    pub async fn send_message(&self, session: &ChatSession, text: &str) -> TurnOutcome {
        let history = self.store.load_turns(&session.client).await;
        let window = tail(&history, self.history_limit);
        let messages = context::build_messages(window, text);

        let mut turn = Turn::new(&session.client, text);
        self.store.append_turn(&session.client, &turn).await;

        let draft = self
            .router
            .generate(session.provider, &session.persona.text, &messages)
            .await;
        let summary = self.summarizer.summarize(&draft.text).await;
        turn.fill_reply(&draft, summary);

        let appended_fallback = self.write_back(&session.client, &turn).await;
        TurnOutcome { turn, appended_fallback }
    }

    /// Regenerate the reply for the most recent turn, overwriting the same
    /// row. Returns `None` when the client has no turns.
    pub async fn retry_last(&self, session: &ChatSession) -> Option<TurnOutcome> {
        let history = self.store.load_turns(&session.client).await;
        let (last, prior) = history.split_last()?;
        let window = tail(prior, self.history_limit);
        let messages = context::build_messages(window, &last.message);

        let draft = self
            .router
            .generate(session.provider, &session.persona.text, &messages)
            .await;
        let summary = self.summarizer.summarize(&draft.text).await;

        let mut turn = last.clone();
        turn.fill_reply(&draft, summary);
        debug!(client = %session.client, turn_id = %turn.id, "regenerated reply");

        let appended_fallback = self.write_back(&session.client, &turn).await;
        Some(TurnOutcome { turn, appended_fallback })
    }

    /// Export a chosen reply to the client's document, then record it as the
    /// turn's final reply. `turn_id == None` targets the most recent turn.
    ///
    /// The export must succeed; the store update afterwards is best-effort.
    pub async fn save_reply(
        &self,
        session: &ChatSession,
        turn_id: Option<&str>,
        text: &str,
    ) -> Result<SavedReply, ServiceError> {
        let exporter = self
            .exporter
            .as_ref()
            .ok_or_else(|| ServiceError::NotConfigured("document exporter".to_owned()))?;

        let history = self.store.load_turns(&session.client).await;
        let turn = match turn_id {
            Some(id) => history.iter().rev().find(|t| t.id == id),
            None => history.last(),
        }
        .ok_or_else(|| ServiceError::TurnNotFound { client: session.client.clone() })?;

        let block = format!("@{} - {}\n\n@Reply - {}", session.client, turn.message, text);
        let receipt = exporter.export(&session.client, &block).await?;

        let mut updated = turn.clone();
        updated.final_reply = text.to_owned();
        updated.summary = self.summarizer.summarize(text).await;
        if !self.store.update_turn(&session.client, &updated).await {
            warn!(
                client = %session.client,
                turn_id = %updated.id,
                "saved reply exported but not recorded in store"
            );
        }
        info!(
            client = %session.client,
            document_id = %receipt.document_id,
            created = receipt.created,
            "reply saved"
        );
        Ok(SavedReply { turn: updated, receipt })
    }

    /// Full stored history for a client, oldest first.
    pub async fn history(&self, client: &str) -> Vec<Turn> {
        self.store.load_turns(client).await
    }

    /// All known client names.
    pub async fn clients(&self) -> Vec<String> {
        self.store.list_partitions().await
    }

    /// Load a persona from a plain-text file.
    pub fn load_persona_file(&self, path: impl AsRef<Path>) -> Result<Persona, ServiceError> {
        Ok(Persona::from_file(path)?)
    }

    /// Load a persona from a stored document's plain text.
    pub async fn load_persona_doc(&self, doc_id: &str) -> Result<Persona, ServiceError> {
        let exporter = self
            .exporter
            .as_ref()
            .ok_or_else(|| ServiceError::NotConfigured("document store".to_owned()))?;
        let text = exporter.docs().document_text(doc_id).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PersonaError::Empty(doc_id.to_owned()).into());
        }
        Ok(Persona::new(doc_id, trimmed))
    }

    /// Update the turn's row in place, appending instead when the update
    /// finds no row. Returns whether the fallback append ran.
    async fn write_back(&self, client: &str, turn: &Turn) -> bool {
        if self.store.update_turn(client, turn).await {
            return false;
        }
        debug!(client, turn_id = %turn.id, "row update missed, appending filled turn");
        self.store.append_turn(client, turn).await;
        true
    }
}

fn tail(turns: &[Turn], limit: usize) -> &[Turn] {
    let start = turns.len().saturating_sub(limit);
    &turns[start..]
}

fn greeting_text(client: &str, new_client: bool) -> String {
    if new_client {
        format!(
            "Reply 1: Hello {client}! I've created a new conversation record for you. \
             How can I help you today? Reply 2: Let me know what's on your mind."
        )
    } else {
        format!(
            "Reply 1: Welcome back, {client}! I've found your previous conversation \
             history. How can I help you today? Reply 2: I remember our previous chats. \
             What would you like to discuss?"
        )
    }
}

#[cfg(test)]
mod tests {
    use replydesk_core::DualReply;

    use super::*;

    #[test]
    fn test_greetings_use_the_two_reply_format() {
        let new = DualReply::parse(&greeting_text("Jane", true));
        assert!(new.primary.contains("Hello Jane"));
        assert!(!new.secondary.is_empty());

        let back = DualReply::parse(&greeting_text("Jane", false));
        assert!(back.primary.contains("Welcome back, Jane"));
        assert!(!back.secondary.is_empty());
    }

    #[test]
    fn test_tail_keeps_most_recent_turns() {
        let turns: Vec<Turn> = (0..5).map(|i| Turn::new("Jane", format!("m{i}"))).collect();
        let window = tail(&turns, 2);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].message, "m3");
        assert_eq!(window[1].message, "m4");

        assert_eq!(tail(&turns, 10).len(), 5);
    }
}
