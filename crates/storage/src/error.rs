//! Typed error enum for the storage layer.
//!
//! The conversation store adapter catches these at its boundary and degrades
//! to boolean/empty returns; the document exporter and the typed REST
//! clients propagate them so callers can surface a status-tagged result.

use thiserror::Error;

/// Storage-layer error covering the spreadsheet and document REST surfaces.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },

    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("not found: {entity} {name}")]
    NotFound { entity: &'static str, name: String },

    #[error("store not configured: {0}")]
    NotConfigured(String),

    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl StoreError {
    /// Whether this error is likely transient (worth retrying).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503),
            _ => false,
        }
    }
}
