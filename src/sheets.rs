use reqwest::Client;
use serde::Serialize;

use crate::{config::Config, error::AppError, google::TokenProvider};

#[derive(Clone, Debug)]
pub struct SheetsClient {
    client: Client,
    address: String,
    tokens: TokenProvider,
    spreadsheet_id: String,
    range: String,
}

#[derive(Serialize)]
struct AppendRequest<'a> {
    values: [&'a [String]; 1],
}

impl SheetsClient {
    pub fn new(client: Client, address: String, tokens: TokenProvider, config: &Config) -> Self {
        SheetsClient {
            client,
            address,
            tokens,
            spreadsheet_id: config.spreadsheet_id.clone(),
            range: config.sheet_range.clone(),
        }
    }

    /// Appends one row after the last filled row of the configured sheet.
    pub async fn append_row(&self, row: &[String]) -> Result<(), AppError> {
        log::debug!("Appending row to spreadsheet {}", self.spreadsheet_id);

        let access_token = self
            .tokens
            .token()
            .await
            .map_err(AppError::SpreadsheetAuth)?;

        self.client
            .post(format!(
                "{}/v4/spreadsheets/{}/values/{}:append",
                self.address, self.spreadsheet_id, self.range
            ))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(access_token)
            .json(&AppendRequest { values: [row] })
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(AppError::Spreadsheet)?;

        Ok(())
    }
}
