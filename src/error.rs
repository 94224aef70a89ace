use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value, json};

use crate::forms::fields::{self, Violation};
use crate::store::StoreError;

#[derive(Debug)]
pub enum SubmissionError {
    MethodNotAllowed,
    /// The body could not be decoded. The reason is logged, never returned.
    MalformedBody(String),
    ValidationFailed {
        violations: Vec<Violation>,
        received: Map<String, Value>,
    },
    ServerMisconfigured,
    PersistenceFailed(StoreError),
    PersistenceUnconfirmed,
    UnexpectedFailure(String),
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::MethodNotAllowed => write!(f, "Method not allowed"),
            SubmissionError::MalformedBody(reason) => write!(f, "Malformed body: {reason}"),
            SubmissionError::ValidationFailed { violations, .. } => {
                write!(f, "Validation failed: {}", fields::describe(violations))
            }
            SubmissionError::ServerMisconfigured => write!(f, "Datastore credentials not configured"),
            SubmissionError::PersistenceFailed(err) => write!(f, "Insert failed: {err}"),
            SubmissionError::PersistenceUnconfirmed => write!(f, "Insert returned no record ID"),
            SubmissionError::UnexpectedFailure(msg) => write!(f, "Unexpected failure: {msg}"),
        }
    }
}

impl std::error::Error for SubmissionError {}

impl SubmissionError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmissionError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SubmissionError::MalformedBody(_) | SubmissionError::ValidationFailed { .. } => {
                StatusCode::BAD_REQUEST
            }
            SubmissionError::ServerMisconfigured
            | SubmissionError::PersistenceFailed(_)
            | SubmissionError::PersistenceUnconfirmed
            | SubmissionError::UnexpectedFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Response body for this error. With `diagnostics` set, raw driver and
    /// panic detail is included.
    pub fn body(&self, diagnostics: bool) -> Value {
        match self {
            SubmissionError::MethodNotAllowed => json!({ "error": "Method not allowed" }),
            SubmissionError::MalformedBody(_) => json!({ "error": "Invalid request body" }),
            SubmissionError::ValidationFailed { violations, received } => json!({
                "error": fields::describe(violations),
                "receivedData": received,
            }),
            SubmissionError::ServerMisconfigured => json!({
                "success": false,
                "error": "Server configuration error",
                "message": "Datastore credentials not configured",
            }),
            SubmissionError::PersistenceFailed(err) => {
                if diagnostics {
                    let mut body = json!({
                        "success": false,
                        "error": "Database error",
                        "message": err.message,
                    });
                    if let Some(details) = &err.details {
                        body["details"] = json!(details);
                    }
                    if let Some(hint) = &err.hint {
                        body["hint"] = json!(hint);
                    }
                    body
                } else {
                    json!({
                        "success": false,
                        "error": "Database error",
                        "message": "Failed to save submission",
                    })
                }
            }
            SubmissionError::PersistenceUnconfirmed => json!({
                "success": false,
                "error": "No data returned",
                "message": "Database did not return inserted record ID",
            }),
            SubmissionError::UnexpectedFailure(msg) => {
                let mut body = json!({
                    "success": false,
                    "error": "Internal server error",
                    "message": "An unexpected error occurred",
                });
                if diagnostics {
                    body["details"] = json!(msg);
                }
                body
            }
        }
    }

    pub fn into_response_with(self, diagnostics: bool) -> Response {
        match &self {
            SubmissionError::MethodNotAllowed => {}
            SubmissionError::MalformedBody(_) | SubmissionError::ValidationFailed { .. } => {
                tracing::warn!("Rejected submission: {self}");
            }
            _ => tracing::error!("Submission failed: {self}"),
        }

        (self.status(), axum::Json(self.body(diagnostics))).into_response()
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}

impl From<StoreError> for SubmissionError {
    fn from(err: StoreError) -> Self {
        SubmissionError::PersistenceFailed(err)
    }
}
