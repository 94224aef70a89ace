pub mod forms;

use axum::routing::{MethodRouter, post};
use axum::Router;

use crate::state::SharedState;

/// POST submits, OPTIONS answers the preflight, anything else is 405.
fn form_endpoint<H, T>(handler: H) -> MethodRouter<SharedState>
where
    H: axum::handler::Handler<T, SharedState>,
    T: 'static,
{
    post(handler)
        .options(forms::preflight)
        .fallback(forms::method_not_allowed)
}

pub fn form_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/submit-booking", form_endpoint(forms::submit_booking))
        .route("/api/submit-form", form_endpoint(forms::submit_contact))
}
