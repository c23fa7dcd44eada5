//! Domain models used by the backend: generation requests and the generated
//! problem payload with its test cases, starter templates, and hints.

use serde::{Deserialize, Serialize};

/// Parameters for one generation request. Every field is optional on the
/// wire; absent fields are filled from configured defaults at the edge.
/// Immutable once sent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProblemRequest {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub difficulty: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub num_test_cases: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub languages: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub time_limit: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub memory_limit: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub additional_instructions: Option<String>,
}

/// Core metadata of a generated problem.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProblemMeta {
  pub id: String,
  pub title: String,
  pub description: String,
  pub difficulty: String,
  pub category: String,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub constraints: Vec<String>,
}

/// One test case. Hidden cases exist in the payload but are never shown.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestCase {
  pub input: String,
  pub expected_output: String,
  #[serde(default)]
  pub is_hidden: bool,
}

/// Per-language starter signature shipped with a problem.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolutionTemplate {
  pub language: String,
  pub function_signature: String,
}

/// Full payload returned by the generator service. Read-only after receipt;
/// the next generation replaces it wholesale, never merges.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedProblem {
  pub problem: ProblemMeta,
  #[serde(default)]
  pub test_cases: Vec<TestCase>,
  #[serde(default)]
  pub solution_templates: Vec<SolutionTemplate>,
  #[serde(default)]
  pub hints: Vec<String>,
  pub time_limit: f64,
  pub memory_limit: f64,
}

impl GeneratedProblem {
  /// Stable key for all persistence lookups.
  pub fn id(&self) -> &str {
    &self.problem.id
  }

  /// Starter signature for `language`, matched case-insensitively.
  pub fn template_for(&self, language: &str) -> Option<&str> {
    self
      .solution_templates
      .iter()
      .find(|t| t.language.eq_ignore_ascii_case(language))
      .map(|t| t.function_signature.as_str())
  }

  /// Test cases meant to be shown to the user.
  pub fn visible_cases(&self) -> impl Iterator<Item = &TestCase> {
    self.test_cases.iter().filter(|tc| !tc.is_hidden)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn problem_with_templates() -> GeneratedProblem {
    GeneratedProblem {
      problem: ProblemMeta {
        id: "prob-1".into(),
        title: "Two Sum".into(),
        description: "Find two numbers.".into(),
        difficulty: "easy".into(),
        category: "Two Pointers".into(),
        tags: vec![],
        constraints: vec![],
      },
      test_cases: vec![
        TestCase { input: "[1,2]".into(), expected_output: "[0,1]".into(), is_hidden: false },
        TestCase { input: "[3,4]".into(), expected_output: "[1,0]".into(), is_hidden: true },
      ],
      solution_templates: vec![SolutionTemplate {
        language: "Python".into(),
        function_signature: "def twoSum(nums, target):".into(),
      }],
      hints: vec![],
      time_limit: 1.0,
      memory_limit: 256.0,
    }
  }

  #[test]
  fn template_lookup_ignores_case() {
    let p = problem_with_templates();
    assert_eq!(p.template_for("python"), Some("def twoSum(nums, target):"));
    assert_eq!(p.template_for("PYTHON"), Some("def twoSum(nums, target):"));
    assert_eq!(p.template_for("Java"), None);
  }

  #[test]
  fn visible_cases_skip_hidden_ones() {
    let p = problem_with_templates();
    let visible: Vec<_> = p.visible_cases().collect();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].input, "[1,2]");
  }

  #[test]
  fn request_serializes_without_absent_fields() {
    let req = ProblemRequest { difficulty: Some("easy".into()), ..Default::default() };
    let json = serde_json::to_string(&req).unwrap();
    assert_eq!(json, r#"{"difficulty":"easy"}"#);
  }
}
