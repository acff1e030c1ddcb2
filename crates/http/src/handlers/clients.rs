//! Client roster, session bootstrap, and history handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use std::sync::Arc;

use crate::api_error::ApiError;
use crate::api_types::{
    ClientsResponse, HistoryQuery, HistoryResponse, SessionResponse, StartSessionRequest,
};
use crate::AppState;
use replydesk_llm::ProviderKind;

/// `GET /api/clients`, every client with a conversation record.
pub async fn list_clients(State(state): State<Arc<AppState>>) -> Json<ClientsResponse> {
    let clients = state.service.clients().await;
    Json(ClientsResponse { clients })
}

/// `POST /api/clients/{client}/session`, greets the client and ensures
/// their conversation record exists.
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Path(client): Path<String>,
    Json(req): Json<StartSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let client = client.trim().to_owned();
    if client.is_empty() {
        return Err(ApiError::BadRequest("client name must not be empty".to_owned()));
    }
    let provider = req.provider.unwrap_or(ProviderKind::OpenAi);
    let (session, greeting) = state.service.start_session(&client, provider).await;
    Ok(Json(SessionResponse {
        session_id: session.id,
        client: session.client,
        provider,
        greeting,
    }))
}

/// `GET /api/clients/{client}/history`, the client's saved turns, oldest first.
pub async fn client_history(
    State(state): State<Arc<AppState>>,
    Path(client): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let mut turns = state.service.history(&client).await;
    if let Some(limit) = query.limit {
        let excess = turns.len().saturating_sub(limit);
        turns.drain(..excess);
    }
    Ok(Json(HistoryResponse { client, turns }))
}
