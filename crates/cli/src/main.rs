use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use replydesk_core::{env_nonempty, env_parse_with_default};
use replydesk_llm::{
    AnthropicProvider, ModelRouter, OpenAiProvider, ProviderKind, RetryPolicy, Summarizer,
};
use replydesk_service::{ChatService, DEFAULT_HISTORY_LIMIT};
use replydesk_storage::{DocsClient, DocumentExporter, StoreBackend};

mod commands;

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com";
const DEFAULT_SHEETS_URL: &str = "https://sheets.googleapis.com";
const DEFAULT_DOCS_URL: &str = "https://docs.googleapis.com";
const DEFAULT_DRIVE_URL: &str = "https://www.googleapis.com";

#[derive(Parser)]
#[command(name = "replydesk")]
#[command(about = "Persona chat console with dual-reply drafting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat interactively, drafting two replies per message
    Chat {
        /// Client name; prompted for when omitted
        client: Option<String>,
        #[arg(short, long, default_value = "openai")]
        provider: ProviderKind,
    },
    /// Run the HTTP API server
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(short = 'H', long)]
        host: Option<String>,
    },
    /// List clients with a conversation record
    Clients,
    /// Print a client's saved turns as JSON
    History {
        client: String,
        /// Keep only the most recent turns
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Send one message and print the drafted turn as JSON
    Send {
        client: String,
        message: String,
        #[arg(short, long, default_value = "openai")]
        provider: ProviderKind,
    },
    /// Append text to a client's export document
    Export { client: String, text: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Chat { client, provider } => commands::chat::run(client, provider).await,
        Commands::Serve { port, host } => {
            let host = host
                .or_else(|| env_nonempty("REPLYDESK_HOST"))
                .unwrap_or_else(|| "127.0.0.1".to_owned());
            let port = port.unwrap_or_else(|| env_parse_with_default("REPLYDESK_PORT", 8787));
            commands::serve::run(host, port).await
        },
        Commands::Clients => commands::query::run_clients().await,
        Commands::History { client, limit } => commands::query::run_history(&client, limit).await,
        Commands::Send { client, message, provider } => {
            commands::query::run_send(&client, &message, provider).await
        },
        Commands::Export { client, text } => commands::query::run_export(&client, &text).await,
    }
}

fn base_url(var: &str, default: &str) -> String {
    env_nonempty(var).unwrap_or_else(|| default.to_owned())
}

/// The document exporter, when `REPLYDESK_GOOGLE_TOKEN` is set.
pub(crate) fn build_exporter() -> Result<Option<DocumentExporter>> {
    match env_nonempty("REPLYDESK_GOOGLE_TOKEN") {
        Some(token) => {
            let docs = DocsClient::new(
                token,
                base_url("REPLYDESK_DOCS_URL", DEFAULT_DOCS_URL),
                base_url("REPLYDESK_DRIVE_URL", DEFAULT_DRIVE_URL),
            )?;
            Ok(Some(DocumentExporter::new(docs)))
        },
        None => Ok(None),
    }
}

/// Assemble the chat service from environment configuration.
///
/// Missing credentials disable the component they configure: the provider
/// goes unregistered, the store falls back to memory, the exporter stays
/// absent. Each fallback logs one warning here and later calls
/// short-circuit without touching the network.
pub(crate) async fn build_service() -> Result<ChatService> {
    let openai_key = env_nonempty("OPENAI_API_KEY");
    let openai_url = base_url("REPLYDESK_OPENAI_URL", DEFAULT_OPENAI_URL);

    let openai = match openai_key.clone() {
        Some(key) => Some(OpenAiProvider::new(key, openai_url.clone())?),
        None => {
            tracing::warn!("OPENAI_API_KEY not set, OpenAI provider disabled");
            None
        },
    };
    let anthropic = match env_nonempty("ANTHROPIC_API_KEY") {
        Some(key) => {
            Some(AnthropicProvider::new(key, base_url("REPLYDESK_ANTHROPIC_URL", DEFAULT_ANTHROPIC_URL))?)
        },
        None => {
            tracing::warn!("ANTHROPIC_API_KEY not set, Claude provider disabled");
            None
        },
    };
    let router = ModelRouter::new(openai, anthropic, RetryPolicy::fixed(3, Duration::from_secs(5)));

    // The summarizer owns its provider so its fixed parameters never leak
    // into chat calls.
    let summarizer = match openai_key {
        Some(key) => Summarizer::new(Some(OpenAiProvider::new(key, openai_url)?)),
        None => Summarizer::disabled(),
    };

    let token = env_nonempty("REPLYDESK_GOOGLE_TOKEN");
    let store = match (env_nonempty("REPLYDESK_SPREADSHEET_ID"), token) {
        (Some(spreadsheet_id), Some(token)) => StoreBackend::new_sheets(
            token,
            spreadsheet_id,
            base_url("REPLYDESK_SHEETS_URL", DEFAULT_SHEETS_URL),
        )?,
        _ => {
            tracing::warn!(
                "REPLYDESK_SPREADSHEET_ID or REPLYDESK_GOOGLE_TOKEN not set, \
                 using in-memory store"
            );
            StoreBackend::new_memory()
        },
    };

    let mut service = ChatService::new(Arc::new(store), router, summarizer)
        .with_history_limit(env_parse_with_default("REPLYDESK_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT));

    match build_exporter()? {
        Some(exporter) => service = service.with_exporter(exporter),
        None => tracing::warn!("REPLYDESK_GOOGLE_TOKEN not set, document export disabled"),
    }

    if let Some(path) = env_nonempty("REPLYDESK_PERSONA_FILE") {
        match service.load_persona_file(&path) {
            Ok(persona) => {
                tracing::info!(persona = %persona.name, path, "persona loaded from file");
                service = service.with_persona(persona);
            },
            Err(e) => tracing::warn!(path, error = %e, "persona file ignored"),
        }
    } else if let Some(doc_id) = env_nonempty("REPLYDESK_PERSONA_DOC") {
        match service.load_persona_doc(&doc_id).await {
            Ok(persona) => {
                tracing::info!(persona = %persona.name, "persona loaded from document");
                service = service.with_persona(persona);
            },
            Err(e) => tracing::warn!(doc_id, error = %e, "persona document ignored"),
        }
    }

    Ok(service)
}
