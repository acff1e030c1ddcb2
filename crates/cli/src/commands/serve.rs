use anyhow::Result;
use replydesk_http::{AppState, create_router};
use std::sync::Arc;

use crate::build_service;

pub(crate) async fn run(host: String, port: u16) -> Result<()> {
    let service = Arc::new(build_service().await?);
    let state = Arc::new(AppState { service });

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
