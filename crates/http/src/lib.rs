//! HTTP API server for replydesk
//!
//! A thin axum front end over the chat service. The server keeps no session
//! state of its own: every route names the client it operates on, and the
//! conversation store is the single source of truth.

mod api_error;
mod api_types;
mod handlers;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use replydesk_service::ChatService;

pub use api_error::ApiError;
pub use api_types::{
    ClientsResponse, HistoryQuery, HistoryResponse, RetryRequest, SaveReplyRequest,
    SendMessageRequest, SessionResponse, StartSessionRequest,
};

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Chat orchestration shared with any other front end in the process.
    pub service: Arc<ChatService>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/clients", get(handlers::clients::list_clients))
        .route("/api/clients/{client}/session", post(handlers::clients::start_session))
        .route("/api/clients/{client}/history", get(handlers::clients::client_history))
        .route("/api/clients/{client}/messages", post(handlers::chat::send_message))
        .route("/api/clients/{client}/retry", post(handlers::chat::retry_message))
        .route("/api/clients/{client}/save", post(handlers::chat::save_reply))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
