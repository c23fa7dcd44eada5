//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.
//!
//! Generation failures surface as error DTOs with a non-success status; the
//! previously delivered problem stays valid on the client.

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::domain::ProblemRequest;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(catalog(&state))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(form_settings(&state))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_generate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ProblemRequest>,
) -> Response {
  match generate_problem(&state, body).await {
    Ok(out) => {
      info!(target: "problem", id = %out.view.id, "HTTP generate served");
      Json(out).into_response()
    }
    Err(message) => {
      (StatusCode::BAD_GATEWAY, Json(ErrorOut { error: message })).into_response()
    }
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_problem(State(state): State<Arc<AppState>>) -> Response {
  match current_problem(&state).await {
    Some(out) => Json(out).into_response(),
    None => (
      StatusCode::NOT_FOUND,
      Json(ErrorOut { error: "No problem has been generated yet.".into() }),
    )
      .into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(%q.problem_id))]
pub async fn http_get_workspace(
  State(state): State<Arc<AppState>>,
  Query(q): Query<WorkspaceQuery>,
) -> Response {
  match load_workspace(&state, &q.problem_id, q.language.as_deref()).await {
    Ok(workspace) => {
      info!(target: "problem", id = %q.problem_id, language = %workspace.language, "HTTP workspace served");
      Json(workspace).into_response()
    }
    Err(message) => (StatusCode::NOT_FOUND, Json(ErrorOut { error: message })).into_response(),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.problem_id, %body.language))]
pub async fn http_switch_language(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SwitchLanguageIn>,
) -> Response {
  match switch_language(&state, &body.problem_id, &body.language).await {
    Ok(workspace) => Json(workspace).into_response(),
    Err(message) => (StatusCode::NOT_FOUND, Json(ErrorOut { error: message })).into_response(),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.problem_id, %body.language, code_len = body.code.len()))]
pub async fn http_edit_code(
  State(state): State<Arc<AppState>>,
  Json(body): Json<EditCodeIn>,
) -> impl IntoResponse {
  edit_code(&state, &body.problem_id, &body.language, &body.code);
  Json(SavedOut { saved: true, problem_id: body.problem_id, language: body.language })
}
