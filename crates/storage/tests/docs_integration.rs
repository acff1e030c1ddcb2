//! Integration tests for document export against a mock server.

#![allow(clippy::unwrap_used, reason = "integration test code")]

use replydesk_storage::{DocsClient, DocumentExporter, StoreError};
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn exporter(server: &MockServer) -> DocumentExporter {
    let docs = DocsClient::new("test-token".to_owned(), server.uri(), server.uri()).unwrap();
    DocumentExporter::new(docs)
}

fn document_body(end_index: i64, text: &str) -> serde_json::Value {
    serde_json::json!({
        "documentId": "doc-9",
        "body": {
            "content": [
                {"endIndex": 1, "sectionBreak": {}},
                {
                    "endIndex": end_index,
                    "paragraph": {"elements": [{"textRun": {"content": text}}]}
                }
            ]
        }
    })
}

#[tokio::test]
async fn export_creates_document_on_first_save() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param(
            "q",
            "name='Jane_chats' and mimeType='application/vnd.google-apps.document' and trashed=false",
        ))
        .and(query_param("orderBy", "createdTime desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"files": []})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/documents"))
        .and(body_partial_json(serde_json::json!({"title": "Jane_chats"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documentId": "doc-1", "title": "Jane_chats"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/documents/doc-1:batchUpdate"))
        .and(body_string_contains("Document created:"))
        .and(body_string_contains("@Jane - Hello"))
        .and(body_string_contains("\"index\":1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = exporter(&server)
        .export("Jane", "@Jane - Hello\n\n@Reply - Hi Jane")
        .await
        .unwrap();
    assert!(receipt.created);
    assert_eq!(receipt.document_id, "doc-1");
    assert_eq!(receipt.url, "https://docs.google.com/document/d/doc-1/edit");
}

#[tokio::test]
async fn export_appends_to_most_recent_existing_document() {
    let server = MockServer::start().await;

    // Two documents share the title; the search endpoint returns newest
    // first and the exporter must take that one.
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                {"id": "doc-9", "name": "Jane_chats"},
                {"id": "doc-2", "name": "Jane_chats"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/documents/doc-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_body(25, "earlier\n")))
        .expect(1)
        .mount(&server)
        .await;

    // Insertion lands just before the document's end index.
    Mock::given(method("POST"))
        .and(path("/v1/documents/doc-9:batchUpdate"))
        .and(body_string_contains("=== "))
        .and(body_string_contains("@Jane - Another question"))
        .and(body_string_contains("\"index\":24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = exporter(&server)
        .export("Jane", "@Jane - Another question\n\n@Reply - An answer")
        .await
        .unwrap();
    assert!(!receipt.created);
    assert_eq!(receipt.document_id, "doc-9");
}

#[tokio::test]
async fn export_clamps_append_index_for_empty_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [{"id": "doc-9", "name": "Jane_chats"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/documents/doc-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documentId": "doc-9",
            "body": {"content": []}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/documents/doc-9:batchUpdate"))
        .and(body_string_contains("\"index\":1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    exporter(&server).export("Jane", "text").await.unwrap();
}

#[tokio::test]
async fn export_surfaces_search_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .expect(1)
        .mount(&server)
        .await;

    let err = exporter(&server).export("Jane", "text").await.unwrap_err();
    assert!(matches!(err, StoreError::HttpStatus { code: 500, .. }));
}

#[tokio::test]
async fn document_text_walks_paragraphs_and_tables() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/documents/doc-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documentId": "doc-9",
            "body": {
                "content": [
                    {
                        "endIndex": 10,
                        "paragraph": {"elements": [
                            {"textRun": {"content": "You are "}},
                            {"textRun": {"content": "a consultant.\n"}}
                        ]}
                    },
                    {
                        "endIndex": 30,
                        "table": {"tableRows": [{"tableCells": [{
                            "content": [{
                                "paragraph": {"elements": [
                                    {"textRun": {"content": "cell text\n"}}
                                ]}
                            }]
                        }]}]}
                    }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let docs = DocsClient::new("test-token".to_owned(), server.uri(), server.uri()).unwrap();
    let text = docs.document_text("doc-9").await.unwrap();
    assert_eq!(text, "You are a consultant.\ncell text\n");
}
