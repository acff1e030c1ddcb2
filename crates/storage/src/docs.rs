//! Document store client and per-client reply export.
//!
//! Each client owns at most one export document, found by its deterministic
//! title. Exports append below the existing content with a timestamped
//! separator; the first export creates the document. The same client also
//! reads document text for persona loading.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use replydesk_core::TIMESTAMP_FORMAT;

use crate::error::StoreError;

const DOC_URL_PREFIX: &str = "https://docs.google.com/document/d/";
const DOC_MIME_TYPE: &str = "application/vnd.google-apps.document";

/// Typed client for the document and file-search REST surfaces.
#[derive(Clone)]
pub struct DocsClient {
    client: reqwest::Client,
    token: String,
    docs_url: String,
    drive_url: String,
}

impl std::fmt::Debug for DocsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsClient")
            .field("token", &"***")
            .field("docs_url", &self.docs_url)
            .field("drive_url", &self.drive_url)
            .finish()
    }
}

impl DocsClient {
    /// Creates a client for the given bearer token.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(token: String, docs_url: String, drive_url: String) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| StoreError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            token,
            docs_url: docs_url.trim_end_matches('/').to_owned(),
            drive_url: drive_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Find a document id by exact title. The most recently created document
    /// wins when duplicates exist.
    pub async fn find_document(&self, title: &str) -> Result<Option<String>, StoreError> {
        let query = format!(
            "name='{}' and mimeType='{}' and trashed=false",
            title.replace('\'', "\\'"),
            DOC_MIME_TYPE
        );
        let response = self
            .client
            .get(format!("{}/drive/v3/files", self.drive_url))
            .query(&[
                ("q", query.as_str()),
                ("orderBy", "createdTime desc"),
                ("fields", "files(id,name)"),
                ("pageSize", "10"),
            ])
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;
        let body = success_body(response).await?;

        let list: FileList = serde_json::from_str(&body).map_err(|e| StoreError::JsonParse {
            context: format!("file search for {title}"),
            source: e,
        })?;
        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    /// Create an empty document with the given title and return its id.
    pub async fn create_document(&self, title: &str) -> Result<String, StoreError> {
        let response = self
            .client
            .post(format!("{}/v1/documents", self.docs_url))
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&CreateDocumentRequest { title: title.to_owned() })
            .send()
            .await?;
        let body = success_body(response).await?;

        let doc: DocumentMeta = serde_json::from_str(&body).map_err(|e| StoreError::JsonParse {
            context: format!("created document {title}"),
            source: e,
        })?;
        Ok(doc.document_id)
    }

    /// End index of the document body; insertion just before it appends.
    pub async fn end_index(&self, document_id: &str) -> Result<i64, StoreError> {
        let doc = self.fetch_document(document_id).await?;
        Ok(doc
            .body
            .content
            .last()
            .and_then(|element| element.end_index)
            .unwrap_or(1))
    }

    /// Insert text at the given body index.
    pub async fn insert_text(
        &self,
        document_id: &str,
        index: i64,
        text: &str,
    ) -> Result<(), StoreError> {
        let request = DocBatchUpdateRequest {
            requests: vec![DocRequest {
                insert_text: InsertTextRequest {
                    location: Location { index },
                    text: text.to_owned(),
                },
            }],
        };
        let response = self
            .client
            .post(format!("{}/v1/documents/{document_id}:batchUpdate", self.docs_url))
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&request)
            .send()
            .await?;
        success_body(response).await?;
        Ok(())
    }

    /// Plain text of the document body: paragraph runs plus table cells,
    /// in document order.
    pub async fn document_text(&self, document_id: &str) -> Result<String, StoreError> {
        let doc = self.fetch_document(document_id).await?;
        let mut text = String::new();
        collect_text(&doc.body.content, &mut text);
        Ok(text)
    }

    async fn fetch_document(&self, document_id: &str) -> Result<Document, StoreError> {
        let response = self
            .client
            .get(format!("{}/v1/documents/{document_id}", self.docs_url))
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;
        let body = success_body(response).await?;

        serde_json::from_str(&body).map_err(|e| StoreError::JsonParse {
            context: format!("document {document_id}"),
            source: e,
        })
    }
}

/// Success result of a reply export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportReceipt {
    pub document_id: String,
    pub url: String,
    /// Whether this export created the client's document.
    pub created: bool,
}

/// Appends saved replies to the per-client export document.
#[derive(Debug, Clone)]
pub struct DocumentExporter {
    docs: DocsClient,
}

impl DocumentExporter {
    pub fn new(docs: DocsClient) -> Self {
        Self { docs }
    }

    /// The underlying document client, also used for persona loading.
    pub fn docs(&self) -> &DocsClient {
        &self.docs
    }

    /// Ensure the client's document exists and append the text to it with a
    /// timestamped separator.
    pub async fn export(&self, client: &str, text: &str) -> Result<ExportReceipt, StoreError> {
        let title = document_title(client);
        let stamp = Utc::now().format(TIMESTAMP_FORMAT);

        if let Some(document_id) = self.docs.find_document(&title).await? {
            let end = self.docs.end_index(&document_id).await?;
            let index = (end - 1).max(1);
            let block = format!("\n\n=== {stamp} ===\n\n{text}");
            self.docs.insert_text(&document_id, index, &block).await?;
            info!(client, document_id, "appended reply to export document");
            return Ok(ExportReceipt {
                url: document_url(&document_id),
                document_id,
                created: false,
            });
        }

        let document_id = self.docs.create_document(&title).await?;
        let block = format!("Document created: {stamp}\n\n{text}");
        self.docs.insert_text(&document_id, 1, &block).await?;
        info!(client, document_id, "created export document");
        Ok(ExportReceipt {
            url: document_url(&document_id),
            document_id,
            created: true,
        })
    }
}

/// Deterministic per-client document title.
pub(crate) fn document_title(client: &str) -> String {
    format!("{client}_chats")
}

fn document_url(document_id: &str) -> String {
    format!("{DOC_URL_PREFIX}{document_id}/edit")
}

fn collect_text(elements: &[StructuralElement], out: &mut String) {
    for element in elements {
        if let Some(paragraph) = &element.paragraph {
            for piece in &paragraph.elements {
                if let Some(run) = &piece.text_run {
                    out.push_str(&run.content);
                }
            }
        }
        if let Some(table) = &element.table {
            for row in &table.table_rows {
                for cell in &row.table_cells {
                    collect_text(&cell.content, out);
                }
            }
        }
    }
}

async fn success_body(response: reqwest::Response) -> Result<String, StoreError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(StoreError::HttpStatus { code: status.as_u16(), body });
    }
    Ok(body)
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Serialize)]
struct CreateDocumentRequest {
    title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentMeta {
    document_id: String,
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    body: Body,
}

#[derive(Deserialize, Default)]
struct Body {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuralElement {
    #[serde(default)]
    end_index: Option<i64>,
    #[serde(default)]
    paragraph: Option<Paragraph>,
    #[serde(default)]
    table: Option<Table>,
}

#[derive(Deserialize)]
struct Paragraph {
    #[serde(default)]
    elements: Vec<ParagraphElement>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParagraphElement {
    #[serde(default)]
    text_run: Option<TextRun>,
}

#[derive(Deserialize)]
struct TextRun {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Table {
    #[serde(default)]
    table_rows: Vec<TableRow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableRow {
    #[serde(default)]
    table_cells: Vec<TableCell>,
}

#[derive(Deserialize)]
struct TableCell {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

#[derive(Serialize)]
struct DocBatchUpdateRequest {
    requests: Vec<DocRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocRequest {
    insert_text: InsertTextRequest,
}

#[derive(Serialize)]
struct InsertTextRequest {
    location: Location,
    text: String,
}

#[derive(Serialize)]
struct Location {
    index: i64,
}
