use anyhow::Result;
use replydesk_llm::ProviderKind;

use crate::{build_exporter, build_service};

pub(crate) async fn run_clients() -> Result<()> {
    let service = build_service().await?;
    let clients = service.clients().await;
    println!("{}", serde_json::to_string_pretty(&clients)?);
    Ok(())
}

pub(crate) async fn run_history(client: &str, limit: Option<usize>) -> Result<()> {
    let service = build_service().await?;
    let mut turns = service.history(client).await;
    if let Some(limit) = limit {
        let excess = turns.len().saturating_sub(limit);
        turns.drain(..excess);
    }
    println!("{}", serde_json::to_string_pretty(&turns)?);
    Ok(())
}

pub(crate) async fn run_send(client: &str, message: &str, provider: ProviderKind) -> Result<()> {
    let service = build_service().await?;
    let (session, _) = service.start_session(client, provider).await;
    let outcome = service.send_message(&session, message).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

pub(crate) async fn run_export(client: &str, text: &str) -> Result<()> {
    let exporter = build_exporter()?.ok_or_else(|| {
        anyhow::anyhow!("REPLYDESK_GOOGLE_TOKEN must be set for document export")
    })?;
    let receipt = exporter.export(client, text).await?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}
