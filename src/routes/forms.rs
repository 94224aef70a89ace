use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::SubmissionError;
use crate::forms::{pipeline, FormKind};
use crate::state::SharedState;

pub async fn submit_booking(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, Response> {
    let diagnostics = state.config.expose_diagnostics();
    let schema = FormKind::Booking.schema();

    let record = pipeline::run(&state, schema, &headers, body)
        .await
        .map_err(|e| e.into_response_with(diagnostics))?;

    let booking_id = record.display_id("BK");
    tracing::info!("Booking {booking_id} created");

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Booking created successfully",
            "bookingId": booking_id,
            "dbId": record.id,
            "createdAt": record.created_at,
            "record": record.row,
        })),
    )
        .into_response())
}

pub async fn submit_contact(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, Response> {
    let diagnostics = state.config.expose_diagnostics();
    let schema = FormKind::Contact.schema();

    pipeline::run(&state, schema, &headers, body)
        .await
        .map_err(|e| e.into_response_with(diagnostics))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Thank you for your message!",
        })),
    )
        .into_response())
}

/// CORS preflight. Never validates or persists anything.
pub async fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            ("Access-Control-Allow-Methods", "POST, OPTIONS"),
            ("Access-Control-Allow-Headers", "Content-Type"),
        ],
    )
        .into_response()
}

pub async fn method_not_allowed() -> SubmissionError {
    SubmissionError::MethodNotAllowed
}
