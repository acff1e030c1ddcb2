//! Typed client for the spreadsheet REST surface.
//!
//! Thin request/response wrappers over the v4 API: partition (sheet tab)
//! listing and creation, ranged reads, appends, and in-place updates. All
//! ranges are A1 notation with the sheet title prefix and are
//! percent-encoded into the URL path.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Client for one spreadsheet, addressed by its id.
#[derive(Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
    spreadsheet_id: String,
}

impl std::fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsClient")
            .field("token", &"***")
            .field("base_url", &self.base_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish()
    }
}

impl SheetsClient {
    /// Creates a client for the given bearer token and spreadsheet.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        token: String,
        spreadsheet_id: String,
        base_url: String,
    ) -> Result<Self, StoreError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| StoreError::ClientInit(e.to_string()))?;
        Ok(Self { client, token, base_url, spreadsheet_id })
    }

    /// Titles of all sheet tabs, in spreadsheet order.
    pub async fn sheet_titles(&self) -> Result<Vec<String>, StoreError> {
        let url = format!(
            "{}/v4/spreadsheets/{}",
            self.base_url, self.spreadsheet_id
        );
        let response = self
            .client
            .get(url)
            .query(&[("fields", "sheets.properties.title")])
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;
        let body = success_body(response).await?;

        let meta: SpreadsheetMeta =
            serde_json::from_str(&body).map_err(|e| StoreError::JsonParse {
                context: "spreadsheet metadata".to_owned(),
                source: e,
            })?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    /// Add a new sheet tab with the given title.
    pub async fn add_sheet(&self, title: &str) -> Result<(), StoreError> {
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, self.spreadsheet_id
        );
        let request = BatchUpdateRequest {
            requests: vec![SheetRequest {
                add_sheet: AddSheetRequest {
                    properties: SheetProperties { title: title.to_owned() },
                },
            }],
        };
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&request)
            .send()
            .await?;
        success_body(response).await?;
        Ok(())
    }

    /// Read all cell values in the given A1 range. Cells come back as
    /// strings; missing trailing cells are simply absent from their row.
    pub async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(range)
        );
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;
        let body = success_body(response).await?;

        let values: ValueRange =
            serde_json::from_str(&body).map_err(|e| StoreError::JsonParse {
                context: format!("value range {range}"),
                source: e,
            })?;
        Ok(values
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }

    /// Append rows after the last data row of the range's sheet.
    pub async fn append_values(
        &self,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}:append",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(range)
        );
        let response = self
            .client
            .post(url)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&WriteValues { values: rows })
            .send()
            .await?;
        success_body(response).await?;
        Ok(())
    }

    /// Overwrite the cells of the given range.
    pub async fn update_values(
        &self,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(range)
        );
        let response = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&WriteValues { values: rows })
            .send()
            .await?;
        success_body(response).await?;
        Ok(())
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

// Sheets created via the RAW input option hold strings, but operators edit
// spreadsheets by hand; numeric cells are rendered rather than rejected.
fn cell_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetPropertiesResponse,
}

#[derive(Deserialize)]
struct SheetPropertiesResponse {
    title: String,
}

#[derive(Serialize)]
struct BatchUpdateRequest {
    requests: Vec<SheetRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SheetRequest {
    add_sheet: AddSheetRequest,
}

#[derive(Serialize)]
struct AddSheetRequest {
    properties: SheetProperties,
}

#[derive(Serialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
struct WriteValues<'a> {
    values: &'a [Vec<String>],
}
