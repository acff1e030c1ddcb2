//! Typed error enum for the service layer.
//!
//! Unifies persona, export, and lookup failures into a single error type so
//! front ends can match on specific failure modes instead of downcasting
//! opaque `anyhow::Error` boxes.

use replydesk_core::PersonaError;
use replydesk_storage::StoreError;
use thiserror::Error;

/// Service-layer error for the operations that can fail.
///
/// Message generation never produces one of these: router and summarizer
/// failures degrade to sentinel text inside the turn instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Document export or document read failed.
    #[error("export: {0}")]
    Export(#[from] StoreError),

    /// Persona could not be loaded.
    #[error("persona: {0}")]
    Persona(#[from] PersonaError),

    /// The referenced turn does not exist in the client's history.
    #[error("no matching turn for {client}")]
    TurnNotFound { client: String },

    /// Required backend is not configured.
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Export(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TurnNotFound { .. })
    }
}
