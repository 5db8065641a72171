use async_trait::async_trait;
use reqwest::{header::HeaderValue, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::{
    NewWaitlistEntry, StoreError, StoreRejection, StoreResult, WaitlistRow, WaitlistStore,
};

/// Client for a hosted PostgREST data API (`{url}/rest/v1/{table}`).
#[derive(Debug)]
pub struct PostgrestStore {
    pub http_client: Client,
    pub url: reqwest::Url,
    pub table: String,
    api_key: SecretString,
}

impl PostgrestStore {
    pub fn new<S: AsRef<str>>(
        url: S,
        table: impl Into<String>,
        api_key: SecretString,
        timeout: std::time::Duration,
    ) -> StoreResult<Self> {
        let url = reqwest::Url::parse(url.as_ref())
            .map_err(|e| StoreError::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(PostgrestStore {
            http_client,
            url,
            table: table.into(),
            api_key,
        })
    }

    fn table_url(&self) -> StoreResult<reqwest::Url> {
        self.url
            .join(&format!("rest/v1/{}", self.table))
            .map_err(|e| StoreError::UrlParsing(e.to_string()))
    }
}

#[async_trait]
impl WaitlistStore for PostgrestStore {
    #[tracing::instrument(name = "Inserting waitlist entry", skip_all, fields(table = %self.table))]
    async fn insert_entry(&self, entry: &NewWaitlistEntry) -> StoreResult<Option<WaitlistRow>> {
        let url = self.table_url()?;
        let key = self.api_key.expose_secret();

        let resp = self
            .http_client
            .post(url)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Prefer", HeaderValue::from_static("return=representation"))
            .json(&[entry])
            .send()
            .await?;

        let status = resp.status();
        debug!("{:<20} - {}", "store responded", status);

        let body = resp.text().await?;

        if status.is_success() {
            return rows_from_body(status, body);
        }

        Err(rejection_from_body(status, body))
    }
}

// ###################################
// ->   HELPERS
// ###################################
/// An empty body or an empty array means the row went in without a representation.
fn rows_from_body(status: StatusCode, body: String) -> StoreResult<Option<WaitlistRow>> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Vec<WaitlistRow>>(&body) {
        Ok(rows) => Ok(rows.into_iter().next()),
        Err(_) => Err(StoreError::UnexpectedResponse {
            status: status.as_u16(),
            body,
        }),
    }
}

/// The data API answers errors with `{ code, message, details, hint }`.
/// Anything else is reported as an unexpected response.
fn rejection_from_body(status: StatusCode, body: String) -> StoreError {
    match serde_json::from_str::<StoreRejection>(&body) {
        Ok(rejection) => StoreError::Rejected(rejection),
        Err(_) => StoreError::UnexpectedResponse {
            status: status.as_u16(),
            body,
        },
    }
}
