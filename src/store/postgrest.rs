use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::DatastoreConfig;

use super::{RecordStore, StoreError};

/// Client for a PostgREST-compatible REST endpoint (e.g. Supabase).
pub struct PostgrestStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl PostgrestStore {
    pub fn new(config: &DatastoreConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build datastore client: {e}"))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        })
    }

    fn table_url(&self, table: &str, returning: &[&str]) -> String {
        if returning.is_empty() {
            format!("{}/rest/v1/{table}", self.base_url)
        } else {
            format!("{}/rest/v1/{table}?select={}", self.base_url, returning.join(","))
        }
    }
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn insert(
        &self,
        table: &str,
        record: &Map<String, Value>,
        returning: &[&str],
    ) -> Result<Option<Value>, StoreError> {
        let url = self.table_url(table, returning);

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=representation")
            .header("Accept", "application/vnd.pgrst.object+json")
            .json(record)
            .send()
            .await
            .map_err(|e| StoreError::new(format!("Datastore request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| StoreError::new(format!("Failed to read datastore response: {e}")))?;

        if !status.is_success() {
            return Err(decode_error(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let row: Value = serde_json::from_str(&body)
            .map_err(|e| StoreError::new(format!("Invalid datastore response: {e}")))?;

        Ok(match row {
            Value::Null => None,
            Value::Array(rows) => rows.into_iter().next(),
            other => Some(other),
        })
    }
}

fn decode_error(status: u16, body: &str) -> StoreError {
    match serde_json::from_str::<StoreError>(body) {
        Ok(err) if !err.message.is_empty() => err,
        _ => {
            let snippet: String = body.chars().take(512).collect();
            StoreError {
                code: Some(status.to_string()),
                message: format!("Datastore responded with HTTP {status}"),
                details: (!snippet.is_empty()).then_some(snippet),
                hint: None,
            }
        }
    }
}
