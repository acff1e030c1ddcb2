//! Message, retry, and save handlers.

use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use super::request_session;
use crate::api_error::ApiError;
use crate::api_types::{RetryRequest, SaveReplyRequest, SendMessageRequest};
use crate::AppState;
use replydesk_service::{SavedReply, TurnOutcome};

/// `POST /api/clients/{client}/messages`, records the message and returns
/// the drafted reply candidates.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(client): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<TurnOutcome>, ApiError> {
    let message = req.message.trim().to_owned();
    if message.is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_owned()));
    }
    let session = request_session(&state, &client, req.provider);
    Ok(Json(state.service.send_message(&session, &message).await))
}

/// `POST /api/clients/{client}/retry`, regenerates replies for the client's
/// most recent turn.
pub async fn retry_message(
    State(state): State<Arc<AppState>>,
    Path(client): Path<String>,
    Json(req): Json<RetryRequest>,
) -> Result<Json<TurnOutcome>, ApiError> {
    let session = request_session(&state, &client, req.provider);
    match state.service.retry_last(&session).await {
        Some(outcome) => Ok(Json(outcome)),
        None => Err(ApiError::NotFound(format!("no turns recorded for {client}"))),
    }
}

/// `POST /api/clients/{client}/save`, finalizes a reply and exports the
/// exchange to the client's document.
pub async fn save_reply(
    State(state): State<Arc<AppState>>,
    Path(client): Path<String>,
    Json(req): Json<SaveReplyRequest>,
) -> Result<Json<SavedReply>, ApiError> {
    let text = req.text.trim().to_owned();
    if text.is_empty() {
        return Err(ApiError::BadRequest("reply text must not be empty".to_owned()));
    }
    let session = request_session(&state, &client, None);
    let saved = state.service.save_reply(&session, req.turn_id.as_deref(), &text).await?;
    Ok(Json(saved))
}
