pub mod config;
pub mod error;
pub mod state;
pub mod forms;
pub mod models;
pub mod routes;
pub mod store;

use std::any::Any;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::response::Response;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::SubmissionError;
use crate::state::{AppState, SharedState};
use crate::store::SharedStore;

/// Build the router. `store` is `None` when the datastore is not configured;
/// submissions are then answered with a configuration error.
pub fn build_app(config: Config, store: Option<SharedStore>) -> Router {
    let max_body_size = config.max_body_size;
    let diagnostics = config.expose_diagnostics();
    let state: SharedState = Arc::new(AppState { config, store });

    Router::new()
        .merge(routes::form_routes())
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(CatchPanicLayer::custom(
                    move |err: Box<dyn Any + Send + 'static>| handle_panic(err, diagnostics),
                )),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

fn handle_panic(err: Box<dyn Any + Send + 'static>, diagnostics: bool) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    SubmissionError::UnexpectedFailure(detail).into_response_with(diagnostics)
}
