//! Google Sheets API v4 client.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};
use url::Url;

use zeidan_core::{CellValue, Table};

use super::auth::{ServiceAccountKey, TokenProvider};
use crate::{StoreError, StoreInfo, TableStore};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

/// Size of a freshly created worksheet.
const NEW_SHEET_ROWS: u32 = 100;
const NEW_SHEET_COLUMNS: u32 = 20;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A [`TableStore`] backed by one Google spreadsheet.
pub struct GoogleSheetsStore {
    client: reqwest::Client,
    auth: TokenProvider,
    spreadsheet_id: String,
    base: Url,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<CellValue>>,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    properties: SheetProperties,
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

impl GoogleSheetsStore {
    /// Create a client for the given spreadsheet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unreachable` if the HTTP client cannot be built.
    pub fn new(key: ServiceAccountKey, spreadsheet_id: impl Into<String>) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base = Url::parse(SHEETS_API_BASE)
            .map_err(|e| StoreError::Unreachable(format!("invalid API base URL: {e}")))?;
        Ok(Self {
            auth: TokenProvider::new(client.clone(), key),
            client,
            spreadsheet_id: spreadsheet_id.into(),
            base,
        })
    }

    /// The spreadsheet this client reads and writes.
    #[must_use]
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Build `<base>/<spreadsheet_id>/<segments...>`.
    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Unreachable("invalid API base URL".to_string()))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let token = self.auth.access_token().await?;
        let response = request.bearer_auth(token.expose_secret()).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.auth.clear().await;
        }

        let body = response.text().await.unwrap_or_default();
        let error = classify_error(status, &body);
        warn!(status = %status, kind = error.kind(), "Sheets API request failed");
        Err(error)
    }

    async fn json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StoreError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Unreachable(format!("invalid Sheets API response: {e}")))
    }

    async fn write_header(&self, name: &str, columns: &[&str]) -> Result<(), StoreError> {
        let mut url = self.url(&["values", &format!("{}!A1", quote_sheet(name))])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = json!({ "values": [columns] });
        self.send(self.client.put(url).json(&body)).await?;
        Ok(())
    }
}

/// Map a failed Sheets API response to a store error.
#[must_use]
pub fn classify_error(status: reqwest::StatusCode, body: &str) -> StoreError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"));

    match status.as_u16() {
        401 | 403 => StoreError::Unauthenticated(message),
        404 => StoreError::NotFound(message),
        400 if message.contains("Unable to parse range") => StoreError::NotFound(message),
        _ => StoreError::Unreachable(message),
    }
}

/// Quote a worksheet name for A1 notation.
fn quote_sheet(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Extract the spreadsheet ID from a spreadsheet link, or accept a bare ID.
///
/// For links, the ID is the path segment after `/d/`.
#[must_use]
pub fn spreadsheet_id_from_link(link: &str) -> Option<String> {
    let link = link.trim();
    let id = match link.split_once("/d/") {
        Some((_, rest)) => rest.split(['/', '?', '#']).next().unwrap_or_default(),
        None => link,
    };
    (!id.is_empty()).then(|| id.to_string())
}

#[async_trait]
impl TableStore for GoogleSheetsStore {
    #[instrument(skip(self, expected_columns))]
    async fn read_table(
        &self,
        name: &str,
        expected_columns: &[&str],
    ) -> Result<Table, StoreError> {
        let mut url = self.url(&["values", &quote_sheet(name)])?;
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "UNFORMATTED_VALUE")
            .append_pair("dateTimeRenderOption", "FORMATTED_STRING");

        let range: ValueRange = self.json(self.client.get(url)).await?;
        debug!(rows = range.values.len(), "Read worksheet");
        Ok(Table::from_rows(name, range.values, expected_columns))
    }

    #[instrument(skip(self, row))]
    async fn append_row(&self, name: &str, row: Vec<CellValue>) -> Result<(), StoreError> {
        let range = format!("{}!A1", quote_sheet(name));
        let mut url = self.url(&["values", &format!("{range}:append")])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = json!({ "values": [row] });
        self.send(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    #[instrument(skip(self, columns))]
    async fn ensure_table(&self, name: &str, columns: &[&str]) -> Result<bool, StoreError> {
        let info = self.describe().await?;
        if info.tables.iter().any(|t| t == name) {
            return Ok(false);
        }

        let url = self.url(&[])?;
        let url = Url::parse(&format!("{url}:batchUpdate"))
            .map_err(|e| StoreError::Unreachable(format!("invalid batchUpdate URL: {e}")))?;
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": name,
                        "gridProperties": {
                            "rowCount": NEW_SHEET_ROWS,
                            "columnCount": NEW_SHEET_COLUMNS,
                        }
                    }
                }
            }]
        });
        self.send(self.client.post(url).json(&body)).await?;
        self.write_header(name, columns).await?;
        debug!("Created worksheet");
        Ok(true)
    }

    #[instrument(skip(self), fields(spreadsheet_id = %self.spreadsheet_id))]
    async fn describe(&self) -> Result<StoreInfo, StoreError> {
        let mut url = self.url(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "properties.title,sheets.properties.title");

        let meta: SpreadsheetMeta = self.json(self.client.get(url)).await?;
        Ok(StoreInfo {
            title: meta.properties.title,
            tables: meta
                .sheets
                .into_iter()
                .map(|s| s.properties.title)
                .collect(),
            spreadsheet_id: Some(self.spreadsheet_id().to_string()),
            account: Some(self.auth.client_email().to_string()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn store() -> GoogleSheetsStore {
        let key = ServiceAccountKey {
            client_email: "bot@example.com".to_string(),
            private_key: SecretString::from("unused"),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
        };
        GoogleSheetsStore::new(key, "abc123").unwrap()
    }

    #[test]
    fn test_spreadsheet_id_from_link() {
        assert_eq!(
            spreadsheet_id_from_link(
                "https://docs.google.com/spreadsheets/d/1AbC-xyz_9/edit#gid=0"
            )
            .as_deref(),
            Some("1AbC-xyz_9")
        );
        assert_eq!(
            spreadsheet_id_from_link("https://docs.google.com/spreadsheets/d/1AbC?usp=sharing")
                .as_deref(),
            Some("1AbC")
        );
        assert_eq!(spreadsheet_id_from_link(" 1AbC ").as_deref(), Some("1AbC"));
        assert_eq!(spreadsheet_id_from_link(""), None);
        assert_eq!(
            spreadsheet_id_from_link("https://docs.google.com/spreadsheets/d/"),
            None
        );
    }

    #[test]
    fn test_classify_error() {
        use reqwest::StatusCode;

        let body = r#"{"error":{"code":400,"message":"Unable to parse range: 'Vendas'!A1","status":"INVALID_ARGUMENT"}}"#;
        assert!(classify_error(StatusCode::BAD_REQUEST, body).is_not_found());
        assert!(matches!(
            classify_error(StatusCode::FORBIDDEN, ""),
            StoreError::Unauthenticated(_)
        ));
        assert!(classify_error(StatusCode::NOT_FOUND, "").is_not_found());
        assert!(matches!(
            classify_error(StatusCode::TOO_MANY_REQUESTS, ""),
            StoreError::Unreachable(_)
        ));
        assert_eq!(
            classify_error(StatusCode::BAD_GATEWAY, "<html>"),
            StoreError::Unreachable("HTTP 502 Bad Gateway".to_string())
        );
    }

    #[test]
    fn test_store_knows_its_spreadsheet_and_account() {
        let store = store();
        assert_eq!(store.spreadsheet_id(), "abc123");
        assert_eq!(store.auth.client_email(), "bot@example.com");
    }

    #[test]
    fn test_quote_sheet() {
        assert_eq!(quote_sheet("Vendas"), "'Vendas'");
        assert_eq!(quote_sheet("Joe's"), "'Joe''s'");
    }

    #[test]
    fn test_urls_are_percent_encoded() {
        let store = store();
        let url = store.url(&["values", "'Página 1'"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/'P%C3%A1gina%201'"
        );
        let url = store.url(&[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123"
        );
    }
}
