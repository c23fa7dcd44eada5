//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - the generation flow (defaults fill, client call, stale-response guard)
//!   - workspace load / language switch / code edit operations
//!   - catalog assembly for the generation form

use tracing::{error, info, instrument, warn};

use crate::config::RequestDefaults;
use crate::domain::{GeneratedProblem, ProblemRequest};
use crate::protocol::{to_out, CatalogOut, ProblemOut, WorkspaceOut};
use crate::state::AppState;
use crate::workspace;

/// Fill absent request fields from configured defaults. The caller's
/// explicit values always win; `additional_instructions` has no default.
pub fn with_defaults(defaults: &RequestDefaults, mut req: ProblemRequest) -> ProblemRequest {
  req.difficulty = req.difficulty.or_else(|| Some(defaults.difficulty.clone()));
  req.category = req.category.or_else(|| Some(defaults.category.clone()));
  req.num_test_cases = req.num_test_cases.or(Some(defaults.num_test_cases));
  req.languages = req.languages.or_else(|| Some(defaults.languages.clone()));
  req.time_limit = req.time_limit.or(Some(defaults.time_limit));
  req.memory_limit = req.memory_limit.or(Some(defaults.memory_limit));
  req
}

/// Default editor language for a freshly loaded problem: the caller's
/// explicit choice, else the first starter template, else the configured
/// fallback. A stored preference still wins over all of these.
fn default_language_for(
  problem: &GeneratedProblem,
  explicit: Option<&str>,
  fallback: &str,
) -> String {
  explicit
    .map(str::to_string)
    .or_else(|| problem.solution_templates.first().map(|t| t.language.clone()))
    .unwrap_or_else(|| fallback.to_string())
}

/// Run one generation request end to end. A stale response (a newer request
/// started while this one was in flight) is dropped so the caller never
/// renders outdated state; any failure leaves the previous problem in place.
#[instrument(level = "info", skip(state, req))]
pub async fn generate_problem(state: &AppState, req: ProblemRequest) -> Result<ProblemOut, String> {
  let req = with_defaults(&state.config.request, req);
  if let Err(e) = state.store.store_settings(&req) {
    warn!(target: "storage", error = %e, "Could not persist generation settings");
  }

  let ticket = state.begin_generation();
  match state.generator.generate(&req).await {
    Ok(problem) => {
      if state.commit_generation(ticket, problem.clone()).await {
        info!(target: "problem", id = %problem.id(), "Problem generated and committed");
        Ok(to_out(&problem))
      } else {
        Err("A newer generation request superseded this one.".into())
      }
    }
    Err(e) => {
      error!(target: "problem", error = %e, "Problem generation failed");
      Err(e.to_string())
    }
  }
}

/// The active problem as a deliverable DTO, if any.
pub async fn current_problem(state: &AppState) -> Option<ProblemOut> {
  state.current_problem().await.map(|p| to_out(&p))
}

/// Resolve the workspace for a problem id.
#[instrument(level = "info", skip(state), fields(%problem_id))]
pub async fn load_workspace(
  state: &AppState,
  problem_id: &str,
  language: Option<&str>,
) -> Result<WorkspaceOut, String> {
  let problem = state
    .problem_by_id(problem_id)
    .await
    .ok_or_else(|| format!("Unknown problemId: {}", problem_id))?;

  let default =
    default_language_for(&problem, language, &state.config.workspace.default_language);

  Ok(workspace::resolve(&state.store, &problem, &default).into())
}

/// Switch the active language for a problem, returning the swapped pair.
#[instrument(level = "info", skip(state), fields(%problem_id, %language))]
pub async fn switch_language(
  state: &AppState,
  problem_id: &str,
  language: &str,
) -> Result<WorkspaceOut, String> {
  let problem = state
    .problem_by_id(problem_id)
    .await
    .ok_or_else(|| format!("Unknown problemId: {}", problem_id))?;

  Ok(workspace::switch_language(&state.store, &problem, language).into())
}

/// Persist an editor change. Best-effort: the store is a convenience cache,
/// so a failed write never surfaces to the editor.
#[instrument(level = "debug", skip(state, code), fields(%problem_id, %language, code_len = code.len()))]
pub fn edit_code(state: &AppState, problem_id: &str, language: &str, code: &str) {
  workspace::edit(&state.store, problem_id, language, code);
}

/// Settings for seeding the generation form: the last-submitted request,
/// topped up with configured defaults.
pub fn form_settings(state: &AppState) -> ProblemRequest {
  let stored = state.store.settings().unwrap_or_default();
  with_defaults(&state.config.request, stored)
}

/// Catalogs for the generation form.
pub fn catalog(state: &AppState) -> CatalogOut {
  let w = &state.config.workspace;
  CatalogOut {
    languages: w.languages.clone(),
    topics: w.topics.clone(),
    difficulties: w.difficulties.clone(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{ProblemMeta, SolutionTemplate};

  fn problem_with_java_template() -> GeneratedProblem {
    GeneratedProblem {
      problem: ProblemMeta {
        id: "p1".into(),
        title: "T".into(),
        description: "D".into(),
        difficulty: "easy".into(),
        category: "Greedy".into(),
        tags: vec![],
        constraints: vec![],
      },
      test_cases: vec![],
      solution_templates: vec![SolutionTemplate {
        language: "Java".into(),
        function_signature: "public int solve() {".into(),
      }],
      hints: vec![],
      time_limit: 1.0,
      memory_limit: 256.0,
    }
  }

  #[test]
  fn defaults_fill_only_absent_fields() {
    let defaults = RequestDefaults::default();
    let req = ProblemRequest {
      difficulty: Some("hard".into()),
      additional_instructions: Some("no recursion".into()),
      ..Default::default()
    };

    let filled = with_defaults(&defaults, req);
    assert_eq!(filled.difficulty.as_deref(), Some("hard"));
    assert_eq!(filled.category.as_deref(), Some("Sorting"));
    assert_eq!(filled.num_test_cases, Some(3));
    assert_eq!(filled.languages, Some(vec!["Python".into()]));
    assert_eq!(filled.time_limit, Some(1.0));
    assert_eq!(filled.memory_limit, Some(256.0));
    assert_eq!(filled.additional_instructions.as_deref(), Some("no recursion"));
  }

  #[test]
  fn default_language_prefers_explicit_then_template_then_fallback() {
    let problem = problem_with_java_template();

    assert_eq!(default_language_for(&problem, Some("C++"), "Python"), "C++");
    assert_eq!(default_language_for(&problem, None, "Python"), "Java");

    let mut bare = problem.clone();
    bare.solution_templates.clear();
    assert_eq!(default_language_for(&bare, None, "Python"), "Python");
  }
}
