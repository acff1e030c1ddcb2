//! Explicit per-conversation session state.

use replydesk_core::Persona;
use replydesk_llm::ProviderKind;
use uuid::Uuid;

/// One front end's conversation with one client.
///
/// Owned by the front end and passed to every service operation; no
/// module-level "current client" state exists anywhere in the workspace.
/// The persona is immutable within the session unless the user installs a
/// different one.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: String,
    pub client: String,
    pub provider: ProviderKind,
    pub persona: Persona,
}

impl ChatSession {
    pub fn new(client: impl Into<String>, provider: ProviderKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client: client.into(),
            provider,
            persona: Persona::default(),
        }
    }

    /// Switch the model provider for subsequent turns.
    pub fn set_provider(&mut self, provider: ProviderKind) {
        self.provider = provider;
    }

    /// Install a different persona for subsequent turns.
    pub fn set_persona(&mut self, persona: Persona) {
        self.persona = persona;
    }
}
