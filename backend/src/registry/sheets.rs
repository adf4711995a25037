//! Google Sheets v4 values API backend.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::store::{Cell, RowStore, StoreError};

/// Row store backed by one sheet (tab) of a Google spreadsheet.
pub struct SheetsRowStore {
    http_client: Client,
    base_url: String,
    spreadsheet_id: String,
    sheet_name: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Cell>>,
}

#[derive(Debug, Serialize)]
struct ValueInput<'a> {
    values: Vec<&'a [Cell]>,
}

impl SheetsRowStore {
    pub fn new(base_url: &str, spreadsheet_id: &str, sheet_name: &str, access_token: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            sheet_name: sheet_name.to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}` with the range percent-encoded.
    fn values_url(&self, range: &str) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| StoreError::Request(format!("bad sheets base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Request("sheets base url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::Unavailable(format!(
                "sheet \"{}\" not found in spreadsheet {}: {}",
                self.sheet_name, self.spreadsheet_id, body
            )));
        }
        Err(StoreError::Request(format!("{}: {}", status, body)))
    }
}

#[async_trait]
impl RowStore for SheetsRowStore {
    fn kind(&self) -> &'static str {
        "sheets"
    }

    async fn rows(&self) -> Result<Vec<Vec<Cell>>, StoreError> {
        let mut url = self.values_url(&self.sheet_name)?;
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "UNFORMATTED_VALUE");

        tracing::debug!("Reading sheet rows: {}", url);

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let range: ValueRange = self
            .check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        Ok(range.values)
    }

    async fn append_row(&self, cells: Vec<Cell>) -> Result<(), StoreError> {
        let mut url = self.values_url(&format!("{}:append", self.sheet_name))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&ValueInput {
                values: vec![cells.as_slice()],
            })
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        self.check_status(response).await?;
        Ok(())
    }

    async fn write_cell(&self, row: u32, column: u32, value: Cell) -> Result<(), StoreError> {
        let range = format!("{}!{}{}", self.sheet_name, column_letter(column), row);
        let mut url = self.values_url(&range)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let cells = [value];
        let response = self
            .http_client
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&ValueInput {
                values: vec![&cells[..]],
            })
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        self.check_status(response).await?;
        Ok(())
    }
}

/// A1-notation column letters for a 1-based column number (1 -> A, 27 -> AA).
fn column_letter(column: u32) -> String {
    let mut n = column;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
