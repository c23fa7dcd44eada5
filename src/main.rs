//! judge · AI-Generated Programming Problems Backend
//!
//! - Axum HTTP + WebSocket API
//! - Problem generation delegated to an external service (POST /generate-problem)
//! - Local persistence of in-progress code per problem and language
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   GENERATOR_BASE_URL    : problem generator service (default "http://127.0.0.1:8000")
//!   STORAGE_PATH    : local storage file (default "./data/storage.json")
//!   JUDGE_CONFIG_PATH  : path to TOML config (catalogs + request defaults)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod store;
mod workspace;
mod generator;
mod render;
mod protocol;
mod state;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Load explicit configuration (TOML file + env overrides).
  let config = AppConfig::load();
  let port = config.server.port;

  // Build shared application state (local store, generator client, last problem).
  let state = Arc::new(AppState::new(config)?);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  let addr = SocketAddr::from(([0, 0, 0, 0], port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "judge_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
