use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::HeaderMap;

use crate::error::SubmissionError;
use crate::models::PersistedRecord;
use crate::state::SharedState;

use super::fields;
use super::parser;
use super::schema::FormSchema;

/// Run one submission through decode, validation, normalization and insert.
pub async fn run(
    state: &SharedState,
    schema: &FormSchema,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<PersistedRecord, SubmissionError> {
    // Credentials are checked before the body is looked at.
    let store = state
        .store
        .as_ref()
        .ok_or(SubmissionError::ServerMisconfigured)?;

    let body = body.map_err(|e| SubmissionError::MalformedBody(e.body_text()))?;

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let payload = parser::parse_body(content_type, &body).map_err(SubmissionError::MalformedBody)?;

    let record = match fields::normalize(schema, &payload) {
        Ok(record) => record,
        Err(violations) => {
            return Err(SubmissionError::ValidationFailed {
                violations,
                received: payload,
            });
        }
    };

    let warnings = fields::advisories(schema, &payload);
    if !warnings.is_empty() {
        tracing::warn!("Format warnings for {:?} submission: {:?}", schema.kind, warnings);
    }

    tracing::debug!("Inserting into {}: {:?}", schema.table, record);

    let row = store.insert(schema.table, &record, schema.returning).await?;

    let persisted = row
        .and_then(PersistedRecord::from_row)
        .ok_or(SubmissionError::PersistenceUnconfirmed)?;

    tracing::info!("Stored {:?} submission {} in {}", schema.kind, persisted.id, schema.table);

    Ok(persisted)
}
