//! End-to-end service tests over the in-memory store and mock HTTP servers.

#![allow(clippy::unwrap_used, reason = "integration test code")]

use std::sync::Arc;
use std::time::Duration;

use replydesk_core::Persona;
use replydesk_llm::{ModelRouter, OpenAiProvider, ProviderKind, RetryPolicy, Summarizer};
use replydesk_service::{ChatService, ChatSession, ServiceError};
use replydesk_storage::{DocsClient, DocumentExporter, SheetsClient, SheetsStore, StoreBackend};
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn memory_service() -> ChatService {
    ChatService::new(
        Arc::new(StoreBackend::new_memory()),
        ModelRouter::new(None, None, RetryPolicy::none()),
        Summarizer::disabled(),
    )
}

fn openai_service(server: &MockServer) -> ChatService {
    let provider = OpenAiProvider::new("test-key".to_owned(), server.uri()).unwrap();
    ChatService::new(
        Arc::new(StoreBackend::new_memory()),
        ModelRouter::new(Some(provider), None, RetryPolicy::none()),
        Summarizer::disabled(),
    )
}

fn exporting_service(server: &MockServer) -> ChatService {
    let docs = DocsClient::new("test-token".to_owned(), server.uri(), server.uri()).unwrap();
    memory_service().with_exporter(DocumentExporter::new(docs))
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

// ── Sessions ─────────────────────────────────────────────────────

#[tokio::test]
async fn start_session_distinguishes_new_and_returning_clients() {
    let service = memory_service();

    let (session, greeting) = service.start_session("Jane", ProviderKind::OpenAi).await;
    assert!(greeting.new_client);
    assert!(greeting.text.contains("Hello Jane"));
    assert_eq!(session.client, "Jane");

    let (_, greeting) = service.start_session("Jane", ProviderKind::OpenAi).await;
    assert!(!greeting.new_client);
    assert!(greeting.text.contains("Welcome back, Jane"));

    // Greetings are presentation only.
    assert!(service.history("Jane").await.is_empty());
    assert_eq!(service.clients().await, vec!["Jane".to_owned()]);
}

#[tokio::test]
async fn configured_persona_reaches_the_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("You are a negotiator."))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("Reply 1: A Reply 2: B")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service =
        openai_service(&server).with_persona(Persona::new("negotiator", "You are a negotiator."));
    let (session, _) = service.start_session("Jane", ProviderKind::OpenAi).await;
    assert_eq!(session.persona.name, "negotiator");
    service.send_message(&session, "Hi").await;
}

// ── Send ─────────────────────────────────────────────────────────

#[tokio::test]
async fn send_message_fills_one_row_per_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("Reply 1: Hello Reply 2: Hi there")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = openai_service(&server);
    let (session, _) = service.start_session("Jane", ProviderKind::OpenAi).await;
    let outcome = service.send_message(&session, "Hi").await;

    assert!(!outcome.appended_fallback);
    assert_eq!(outcome.turn.reply_primary, "Hello");
    assert_eq!(outcome.turn.reply_secondary, "Hi there");
    assert_eq!(outcome.turn.final_reply, "Reply 1: Hello Reply 2: Hi there");
    assert_eq!(outcome.turn.summary, outcome.turn.final_reply);
    assert!(!outcome.turn.id.is_empty());

    let history = service.history("Jane").await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0], outcome.turn);
}

#[tokio::test]
async fn send_message_threads_prior_history_to_the_model() {
    let server = MockServer::start().await;

    // Capped mock serves the first turn, then falls through to the mock
    // that requires the first exchange in the request body.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("Reply 1: First answer Reply 2: Alt one")),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("First question"))
        .and(body_string_contains("First answer"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("Reply 1: Second answer Reply 2: Alt two")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = openai_service(&server);
    let (session, _) = service.start_session("Jane", ProviderKind::OpenAi).await;
    service.send_message(&session, "First question").await;
    let outcome = service.send_message(&session, "Second question").await;

    assert_eq!(outcome.turn.reply_primary, "Second answer");
    assert_eq!(service.history("Jane").await.len(), 2);
}

#[tokio::test]
async fn history_window_respects_the_configured_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("Reply 1: Ok Reply 2: Fine")),
        )
        .expect(3)
        .mount(&server)
        .await;

    let service = openai_service(&server).with_history_limit(1);
    let (session, _) = service.start_session("Jane", ProviderKind::OpenAi).await;
    service.send_message(&session, "m-one").await;
    service.send_message(&session, "m-two").await;
    service.send_message(&session, "m-three").await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    let third = std::str::from_utf8(&requests[2].body).unwrap();
    assert!(third.contains("m-two"));
    assert!(!third.contains("m-one"));
}

#[tokio::test]
async fn send_message_survives_an_unconfigured_provider() {
    let service = memory_service();
    let (session, _) = service.start_session("Jane", ProviderKind::Claude).await;
    let outcome = service.send_message(&session, "Hi").await;

    assert_eq!(
        outcome.turn.reply_primary,
        "I encountered an error. Please try again."
    );
    assert!(outcome.turn.reply_secondary.starts_with("Technical issue:"));
    assert_eq!(service.history("Jane").await.len(), 1);
}

#[tokio::test]
async fn send_message_appends_when_the_row_update_misses() {
    let server = MockServer::start().await;

    // The backing sheet never returns the appended row, so the in-place
    // update cannot find it and the filled turn is appended instead.
    Mock::given(method("GET"))
        .and(path_regex(r"/values/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"values": []})),
        )
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r":append$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let sheets = SheetsClient::new("test-token".to_owned(), "test-sheet".to_owned(), server.uri())
        .unwrap();
    let store =
        StoreBackend::Sheets(SheetsStore::new(sheets).with_append_retry_delay(Duration::from_millis(10)));
    let service = ChatService::new(
        Arc::new(store),
        ModelRouter::new(None, None, RetryPolicy::none()),
        Summarizer::disabled(),
    );

    let session = ChatSession::new("Jane", ProviderKind::OpenAi);
    let outcome = service.send_message(&session, "Hi").await;
    assert!(outcome.appended_fallback);
}

// ── Retry ────────────────────────────────────────────────────────

#[tokio::test]
async fn retry_last_overwrites_the_same_row() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("Reply 1: Take one Reply 2: Alt")),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("Reply 1: Take two Reply 2: Alt")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = openai_service(&server);
    let (session, _) = service.start_session("Jane", ProviderKind::OpenAi).await;
    let first = service.send_message(&session, "Hi").await;
    let retried = service.retry_last(&session).await.unwrap();

    assert_eq!(retried.turn.id, first.turn.id);
    assert!(!retried.appended_fallback);

    let history = service.history("Jane").await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reply_primary, "Take two");
}

#[tokio::test]
async fn retry_last_returns_none_without_history() {
    let service = memory_service();
    let (session, _) = service.start_session("Jane", ProviderKind::OpenAi).await;
    assert!(service.retry_last(&session).await.is_none());
}

// ── Save ─────────────────────────────────────────────────────────

#[tokio::test]
async fn save_reply_exports_and_records_the_final_reply() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"files": []})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documentId": "doc-1", "title": "Jane_chats"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/documents/doc-1:batchUpdate"))
        .and(body_string_contains("@Jane - Hi"))
        .and(body_string_contains("@Reply - Use option one."))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let service = exporting_service(&server);
    let (session, _) = service.start_session("Jane", ProviderKind::OpenAi).await;
    service.send_message(&session, "Hi").await;

    let saved = service.save_reply(&session, None, "Use option one.").await.unwrap();
    assert!(saved.receipt.created);
    assert_eq!(saved.receipt.document_id, "doc-1");
    assert!(saved.receipt.url.contains("doc-1"));
    assert_eq!(saved.turn.final_reply, "Use option one.");
    assert_eq!(saved.turn.summary, "Use option one.");

    let history = service.history("Jane").await;
    assert_eq!(history[0].final_reply, "Use option one.");
}

#[tokio::test]
async fn save_reply_requires_an_exporter() {
    let service = memory_service();
    let (session, _) = service.start_session("Jane", ProviderKind::OpenAi).await;
    service.send_message(&session, "Hi").await;

    let err = service.save_reply(&session, None, "Hello").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotConfigured(_)));
}

#[tokio::test]
async fn save_reply_rejects_unknown_turn_ids() {
    let server = MockServer::start().await;
    let service = exporting_service(&server);
    let (session, _) = service.start_session("Jane", ProviderKind::OpenAi).await;

    let err = service
        .save_reply(&session, Some("missing-id"), "Hello")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ── Personas ─────────────────────────────────────────────────────

#[tokio::test]
async fn persona_loads_from_a_file() {
    let service = memory_service();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("mentor.txt");
    std::fs::write(&file, "You are a mentor.\n").unwrap();

    let persona = service.load_persona_file(&file).unwrap();
    assert_eq!(persona.name, "mentor");
    assert_eq!(persona.text, "You are a mentor.");

    let err = service.load_persona_file(dir.path().join("missing.txt"));
    assert!(matches!(err, Err(ServiceError::Persona(_))));
}

#[tokio::test]
async fn persona_loads_from_a_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/documents/persona-doc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documentId": "persona-doc",
            "body": {"content": [{
                "endIndex": 24,
                "paragraph": {"elements": [{"textRun": {"content": "You are a negotiator.\n"}}]}
            }]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = exporting_service(&server);
    let persona = service.load_persona_doc("persona-doc").await.unwrap();
    assert_eq!(persona.name, "persona-doc");
    assert_eq!(persona.text, "You are a negotiator.");
}

#[tokio::test]
async fn persona_doc_requires_a_document_store() {
    let service = memory_service();
    let err = service.load_persona_doc("persona-doc").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotConfigured(_)));
}
