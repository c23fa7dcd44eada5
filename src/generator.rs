//! HTTP client for the problem generator service.
//!
//! One typed call: POST {base_url}/generate-problem with a JSON-encoded
//! `ProblemRequest`, decoded into a `GeneratedProblem`. A single best-effort
//! round trip: no retries, no cancellation; the per-request timeout comes
//! from the client configuration.
//!
//! Calls are instrumented and log latency and id/title previews, never
//! request or response bodies.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::GeneratorConfig;
use crate::domain::{GeneratedProblem, ProblemRequest};

/// Failures of a generation round trip.
#[derive(Debug, Error)]
pub enum GeneratorError {
  /// Transport failure or non-success HTTP status.
  #[error("generator request failed: {0}")]
  Request(String),
  /// The response body is not a valid problem payload.
  #[error("generator response could not be decoded: {0}")]
  Decode(String),
}

/// Thin client around the single generation endpoint.
#[derive(Clone)]
pub struct ProblemGenerator {
  client: reqwest::Client,
  base_url: String,
}

impl ProblemGenerator {
  /// Build a client from explicit configuration.
  pub fn new(cfg: &GeneratorConfig) -> Result<Self, GeneratorError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(cfg.timeout_secs))
      .build()
      .map_err(|e| GeneratorError::Request(e.to_string()))?;

    Ok(Self { client, base_url: cfg.base_url.trim_end_matches('/').to_string() })
  }

  /// Request one generated problem.
  #[instrument(level = "info", skip(self, request), fields(base_url = %self.base_url))]
  pub async fn generate(&self, request: &ProblemRequest) -> Result<GeneratedProblem, GeneratorError> {
    let url = format!("{}/generate-problem", self.base_url);
    let start = std::time::Instant::now();

    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "judge-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(request)
      .send()
      .await
      .map_err(|e| GeneratorError::Request(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_service_error(&body).unwrap_or(body);
      return Err(GeneratorError::Request(format!("generator HTTP {}: {}", status, msg)));
    }

    let body = res.text().await.map_err(|e| GeneratorError::Request(e.to_string()))?;
    let problem = serde_json::from_str::<GeneratedProblem>(&body)
      .map_err(|e| GeneratorError::Decode(e.to_string()))?;

    let elapsed = start.elapsed();
    info!(
      target: "problem",
      ?elapsed,
      id = %problem.id(),
      title_preview = %problem.problem.title.chars().take(40).collect::<String>(),
      "Generated problem received"
    );

    Ok(problem)
  }
}

/// Try to extract the `{"error": "..."}` message the generator service
/// reports on failure.
fn extract_service_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap {
    error: String,
  }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error)
}
