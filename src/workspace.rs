//! Workspace state: the (language, code) pair bound to the active problem.
//!
//! The pair is always resolved in one step. Whenever the language changes,
//! the code shown next to it comes out of the same resolution (stored code,
//! else the problem's starter template, else empty), so there is never an
//! intermediate state pairing old code with a new language.
//!
//! Persistence is write-through: every edit and every language switch lands
//! in the store immediately, which is why switching away from a language
//! loses nothing.

use tracing::{instrument, warn};

use crate::domain::GeneratedProblem;
use crate::store::LocalStore;

/// Resolved editor state for one problem.
#[derive(Clone, Debug)]
pub struct Workspace {
  pub problem_id: String,
  pub language: String,
  pub code: String,
}

/// Resolve the workspace when `problem` becomes current.
///
/// Language: the stored preference, else `default_language`. Code: stored
/// code for that pair, else the starter template (matched case-insensitively
/// against `solution_templates`), else empty. A stored empty string counts
/// as present: the user blanked the editor on purpose.
#[instrument(level = "debug", skip(store, problem), fields(problem_id = %problem.id()))]
pub fn resolve(store: &LocalStore, problem: &GeneratedProblem, default_language: &str) -> Workspace {
  let language = store
    .stored_language(problem.id())
    .unwrap_or_else(|| default_language.to_string());
  resolve_with_language(store, problem, &language)
}

/// Switch the active language, swapping the code in the same step.
/// The previous language's code was already persisted on every edit, so it
/// is simply left behind in the store.
#[instrument(level = "debug", skip(store, problem), fields(problem_id = %problem.id(), %language))]
pub fn switch_language(store: &LocalStore, problem: &GeneratedProblem, language: &str) -> Workspace {
  resolve_with_language(store, problem, language)
}

/// Persist one editor change immediately. Best-effort: a failed write is
/// logged and the in-memory editor state stands.
#[instrument(level = "debug", skip(store, code), fields(%problem_id, %language, code_len = code.len()))]
pub fn edit(store: &LocalStore, problem_id: &str, language: &str, code: &str) {
  if let Err(e) = store.store_code(problem_id, language, code) {
    warn!(target: "storage", error = %e, "Could not persist code edit");
  }
}

fn resolve_with_language(
  store: &LocalStore,
  problem: &GeneratedProblem,
  language: &str,
) -> Workspace {
  if let Err(e) = store.store_language(problem.id(), language) {
    warn!(target: "storage", error = %e, "Could not persist language preference");
  }

  let code = match store.stored_code(problem.id(), language) {
    Some(code) => code,
    None => match problem.template_for(language) {
      Some(template) => {
        // Adopt the template as the starting point and write it through,
        // so later loads see it as regular stored code.
        if let Err(e) = store.store_code(problem.id(), language, template) {
          warn!(target: "storage", error = %e, "Could not persist adopted template");
        }
        template.to_string()
      }
      None => String::new(),
    },
  };

  Workspace {
    problem_id: problem.id().to_string(),
    language: language.to_string(),
    code,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{ProblemMeta, SolutionTemplate, TestCase};
  use tempfile::TempDir;

  fn store_in(dir: &TempDir) -> LocalStore {
    LocalStore::open(dir.path().join("storage.json"))
  }

  fn two_sum() -> GeneratedProblem {
    GeneratedProblem {
      problem: ProblemMeta {
        id: "ts-1".into(),
        title: "Two Sum".into(),
        description: "Given an array, find two indices that sum to target.".into(),
        difficulty: "easy".into(),
        category: "Two Pointers".into(),
        tags: vec![],
        constraints: vec![],
      },
      test_cases: vec![TestCase {
        input: "[2,7,11,15], 9".into(),
        expected_output: "[0,1]".into(),
        is_hidden: false,
      }],
      solution_templates: vec![
        SolutionTemplate {
          language: "Python".into(),
          function_signature: "def twoSum(nums, target):".into(),
        },
        SolutionTemplate {
          language: "Java".into(),
          function_signature: "public int[] twoSum(int[] nums, int target) {".into(),
        },
      ],
      hints: vec![],
      time_limit: 1.0,
      memory_limit: 256.0,
    }
  }

  #[test]
  fn first_load_adopts_template_for_default_language() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let problem = two_sum();

    let ws = resolve(&store, &problem, "Python");

    assert_eq!(ws.language, "Python");
    assert_eq!(ws.code, "def twoSum(nums, target):");
    // The adopted template became regular stored code.
    assert_eq!(store.stored_code("ts-1", "Python").as_deref(), Some("def twoSum(nums, target):"));
    assert_eq!(store.stored_language("ts-1").as_deref(), Some("Python"));
  }

  #[test]
  fn stored_language_wins_over_default() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let problem = two_sum();

    store.store_language("ts-1", "Java").unwrap();
    let ws = resolve(&store, &problem, "Python");

    assert_eq!(ws.language, "Java");
    assert_eq!(ws.code, "public int[] twoSum(int[] nums, int target) {");
  }

  #[test]
  fn switching_away_and_back_recovers_edits() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let problem = two_sum();

    resolve(&store, &problem, "Python");
    edit(&store, "ts-1", "Python", "def twoSum(nums, target):\n    return []");

    let java = switch_language(&store, &problem, "Java");
    assert_eq!(java.language, "Java");
    assert_eq!(java.code, "public int[] twoSum(int[] nums, int target) {");

    let python = switch_language(&store, &problem, "Python");
    assert_eq!(python.code, "def twoSum(nums, target):\n    return []");
  }

  #[test]
  fn template_match_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let problem = two_sum();

    let ws = resolve(&store, &problem, "python");
    assert_eq!(ws.code, "def twoSum(nums, target):");
  }

  #[test]
  fn language_without_template_starts_empty() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let problem = two_sum();

    let ws = switch_language(&store, &problem, "C++");
    assert_eq!(ws.language, "C++");
    assert_eq!(ws.code, "");
    // Nothing fabricated gets persisted for a template-less language.
    assert_eq!(store.stored_code("ts-1", "C++"), None);
  }

  #[test]
  fn blanked_editor_is_not_replaced_by_template() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let problem = two_sum();

    resolve(&store, &problem, "Python");
    edit(&store, "ts-1", "Python", "");

    let ws = resolve(&store, &problem, "Python");
    assert_eq!(ws.code, "");
  }

  #[test]
  fn unreadable_store_falls_back_to_template() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, b"%%%").unwrap();
    let store = LocalStore::open(&path);
    let problem = two_sum();

    let ws = resolve(&store, &problem, "Python");
    assert_eq!(ws.language, "Python");
    assert_eq!(ws.code, "def twoSum(nums, target):");
  }
}
