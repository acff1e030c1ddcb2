//! Request and response types for the REST API.

use replydesk_core::Turn;
use replydesk_llm::ProviderKind;
use replydesk_service::Greeting;
use serde::{Deserialize, Serialize};

/// Body for `POST /api/clients/{client}/session`.
#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    /// Provider for the session. Defaults to OpenAI when omitted.
    #[serde(default)]
    pub provider: Option<ProviderKind>,
}

/// Response for `POST /api/clients/{client}/session`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub client: String,
    pub provider: ProviderKind,
    pub greeting: Greeting,
}

/// Body for `POST /api/clients/{client}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
    #[serde(default)]
    pub provider: Option<ProviderKind>,
}

/// Body for `POST /api/clients/{client}/retry`.
#[derive(Debug, Default, Deserialize)]
pub struct RetryRequest {
    #[serde(default)]
    pub provider: Option<ProviderKind>,
}

/// Body for `POST /api/clients/{client}/save`.
#[derive(Debug, Deserialize)]
pub struct SaveReplyRequest {
    /// Final reply text to record and export.
    pub text: String,
    /// Turn to finalize. Defaults to the client's most recent turn.
    #[serde(default)]
    pub turn_id: Option<String>,
}

/// Query string for `GET /api/clients/{client}/history`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Cap on returned turns, keeping the most recent ones.
    pub limit: Option<usize>,
}

/// Response for `GET /api/clients/{client}/history`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub client: String,
    pub turns: Vec<Turn>,
}

/// Response for `GET /api/clients`.
#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    pub clients: Vec<String>,
}
