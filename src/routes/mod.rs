use axum::Router;

use crate::Config;

mod health;
mod info;

// ---

pub fn router(config: Config) -> Router {
    // ---
    Router::new()
        .merge(info::router())
        .merge(health::router())
        .with_state(config)
}
