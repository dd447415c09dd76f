use crate::types::{ApiErrorBody, AppendBody, ValueRange};
use crate::{Result, SheetsError};
use desk_secrets::TokenProvider;
use std::sync::Arc;

const VALUES_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Values-API client. One instance serves every spreadsheet the process
/// talks to; per-sheet handles are built with [`crate::SheetTab`].
pub struct SheetsClient {
    http: reqwest::Client,
    token: Arc<TokenProvider>,
}

impl SheetsClient {
    pub fn new(http: reqwest::Client, token: Arc<TokenProvider>) -> Self {
        Self { http, token }
    }

    /// Read a range of cells. An empty or unset range yields an empty Vec;
    /// only connection/auth trouble is an error.
    pub async fn values_get(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>> {
        let url = format!("{VALUES_API_BASE}/{spreadsheet_id}/values/{range}");
        let token = self.bearer().await?;
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let response = Self::check_status(response).await?;
        let parsed: ValueRange = response.json().await?;
        Ok(parsed.values)
    }

    /// Append one row after the last data row of `range`.
    pub async fn values_append(
        &self,
        spreadsheet_id: &str,
        range: &str,
        row: Vec<String>,
    ) -> Result<()> {
        let url = format!("{VALUES_API_BASE}/{spreadsheet_id}/values/{range}:append");
        let token = self.bearer().await?;
        let response = self
            .http
            .post(&url)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(token)
            .json(&AppendBody { values: vec![row] })
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn bearer(&self) -> Result<String> {
        self.token.access_token().await.map_err(|err| {
            log::error!("no access token for the values API: {err}");
            SheetsError::Unavailable(format!("no access token: {err}"))
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // Pull the structured message out of the error envelope when the API
        // sends one; fall back to the bare status otherwise.
        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => String::new(),
        };
        log::error!("values API answered {status}: {message}");
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(SheetsError::Unavailable(format!(
                "rejected with {status}: {message}"
            )));
        }
        Err(SheetsError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
