//! HTTP request handlers, grouped by resource.

use replydesk_llm::ProviderKind;
use replydesk_service::ChatSession;

use crate::AppState;

pub mod chat;
pub mod clients;

/// Builds the ephemeral session a handler works with.
///
/// The server keeps no session table. Each request names its client and
/// provider, and the turn log in the store is the durable state.
fn request_session(state: &AppState, client: &str, provider: Option<ProviderKind>) -> ChatSession {
    let mut session = ChatSession::new(client, provider.unwrap_or(ProviderKind::OpenAi));
    session.set_persona(state.service.persona().clone());
    session
}
