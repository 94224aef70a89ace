pub mod postgrest;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::Config;

pub use postgrest::PostgrestStore;

pub type SharedStore = Arc<dyn RecordStore>;

/// Structured error surfaced by the datastore.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StoreError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        StoreError {
            message: message.into(),
            ..Default::default()
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{code}] {}", self.message)?,
            None => write!(f, "{}", self.message)?,
        }
        if let Some(details) = &self.details {
            write!(f, " ({details})")?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert one record into `table` and return the requested columns of
    /// the inserted row. `Ok(None)` means the write was accepted but no row
    /// came back.
    async fn insert(
        &self,
        table: &str,
        record: &Map<String, Value>,
        returning: &[&str],
    ) -> Result<Option<Value>, StoreError>;
}

/// Build the process-wide datastore client, if the secrets are configured.
pub fn from_config(config: &Config) -> Option<SharedStore> {
    let Some(datastore) = config.datastore.as_ref() else {
        tracing::error!("SUPABASE_URL or SUPABASE_SERVICE_KEY not set; submissions will be rejected");
        return None;
    };

    match PostgrestStore::new(datastore) {
        Ok(store) => {
            tracing::info!("Datastore client configured for {}", datastore.url);
            Some(Arc::new(store))
        }
        Err(e) => {
            tracing::error!("Datastore client unavailable: {e}");
            None
        }
    }
}
