//! Library surface for the `podinfo-web` service.
//!
//! The binary in `main.rs` is a thin bootstrap; everything it mounts lives
//! here so integration tests can build the same router in-process:
//! - `config` – environment-backed configuration, loaded once at startup
//! - `credentials` – ordered credential-source chain for Azure tokens
//! - `roles` – the role-assignment listing call against ARM
//! - `metrics` – the six host metrics read via sysinfo
//! - `models` – view payload and the aggregation step
//! - `render` – HTML template collaborator
//! - `routes` – the router gateway (`/` and `/health`)

mod config;
mod credentials;
mod metrics;
mod models;
mod render;
mod roles;

pub mod routes;

pub use config::{load_from_env, Config};
pub use models::{assemble_payload, MetricEntry, ViewPayload};
