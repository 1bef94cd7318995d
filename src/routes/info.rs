//! The pod-info aggregation handler served at `GET /`.
//!
//! One linear sequence per request: list the principal's role assignments
//! (the single await point), fold the outcome into the page status, collect
//! host metrics, render. Remote failures are absorbed into the payload and
//! reported in-page; the route answers HTTP 200 on both paths.

use axum::{extract::State, response::Html, routing::get, Router};
use tracing::{debug, error, info};

use crate::render::Template;
use crate::{metrics, models, render, roles, Config};

// ---

pub fn router() -> Router<Config> {
    // ---
    Router::new().route("/", get(handler))
}

async fn handler(State(config): State<Config>) -> Html<String> {
    // ---
    info!("GET / - gathering pod info");

    // Request input is deliberately ignored; the page depends only on
    // configuration and the host.
    let result = roles::list_for_principal(&config).await;

    match &result {
        Ok(assignments) => {
            info!("fetched {} role assignments", assignments.len());
            debug!("role assignment records: {assignments:?}");
        }
        Err(error) => {
            error!("failed to list role assignments: {error:#}");
        }
    }

    let payload = models::assemble_payload(result, metrics::collect());

    Html(render::render(Template::Index, &payload))
}
