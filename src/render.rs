//! Presentation view models: everything the problem pane renders verbatim.
//!
//! Rendering rules live here so both HTTP and WebSocket delivery serve the
//! same thing: markdown turned into HTML fragments (LaTeX spans pass through
//! untouched for the client-side math renderer), constraints normalized into
//! sentences, hidden test cases filtered out, and the difficulty mapped onto
//! one of three fixed badge tiers.

use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;

use crate::domain::GeneratedProblem;
use crate::util::{capitalize, punctuate};

/// The three difficulty tiers the badge knows how to style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
  Easy,
  Medium,
  Hard,
}

impl DifficultyTier {
  /// Case-insensitive tier lookup. Anything else renders unstyled.
  pub fn parse(difficulty: &str) -> Option<Self> {
    match difficulty.to_ascii_lowercase().as_str() {
      "easy" => Some(Self::Easy),
      "medium" => Some(Self::Medium),
      "hard" => Some(Self::Hard),
      _ => None,
    }
  }

  /// Fixed badge style classes, one set per tier.
  pub fn badge_class(self) -> &'static str {
    match self {
      Self::Easy => "bg-green-100 text-green-800 border-green-200",
      Self::Medium => "bg-orange-100 text-orange-800 border-orange-200",
      Self::Hard => "bg-red-100 text-red-800 border-red-200",
    }
  }
}

/// Difficulty badge: capitalized label plus its style classes.
#[derive(Clone, Debug, Serialize)]
pub struct DifficultyBadge {
  pub label: String,
  pub class: &'static str,
}

/// Build the badge for a raw difficulty string.
pub fn badge(difficulty: &str) -> DifficultyBadge {
  DifficultyBadge {
    label: capitalize(difficulty),
    class: DifficultyTier::parse(difficulty).map(DifficultyTier::badge_class).unwrap_or(""),
  }
}

/// Render markdown to an HTML fragment.
pub fn markdown_html(content: &str) -> String {
  let mut options = Options::empty();
  options.insert(Options::ENABLE_STRIKETHROUGH);
  options.insert(Options::ENABLE_TABLES);
  options.insert(Options::ENABLE_TASKLISTS);

  let parser = Parser::new_ext(content, options);
  let mut out = String::new();
  html::push_html(&mut out, parser);
  out
}

/// Capitalize a constraint and make sure it reads as a sentence.
pub fn normalize_constraint(s: &str) -> String {
  capitalize(&punctuate(s))
}

/// One visible example, preformatted the way the problem pane shows it.
#[derive(Clone, Debug, Serialize)]
pub struct ExampleView {
  pub input: String,
  pub expected_output: String,
  pub block_html: String,
}

/// Everything the problem pane needs, rendered and filtered.
#[derive(Clone, Debug, Serialize)]
pub struct ProblemView {
  pub id: String,
  pub title: String,
  pub difficulty: DifficultyBadge,
  pub category: String,
  pub tags: Vec<String>,
  pub description_html: String,
  pub examples: Vec<ExampleView>,
  pub constraints_html: Vec<String>,
  pub hints: Vec<String>,
  pub time_limit: f64,
  pub memory_limit: f64,
}

/// Project a generated problem onto its view model.
pub fn problem_view(p: &GeneratedProblem) -> ProblemView {
  ProblemView {
    id: p.problem.id.clone(),
    title: p.problem.title.clone(),
    difficulty: badge(&p.problem.difficulty),
    category: p.problem.category.clone(),
    tags: p.problem.tags.clone(),
    description_html: markdown_html(&p.problem.description),
    examples: p
      .visible_cases()
      .map(|tc| ExampleView {
        input: tc.input.clone(),
        expected_output: tc.expected_output.clone(),
        block_html: markdown_html(&format!(
          "```\nInput: {}\nOutput: {}\n```",
          tc.input, tc.expected_output
        )),
      })
      .collect(),
    constraints_html: p
      .problem
      .constraints
      .iter()
      .map(|c| markdown_html(&normalize_constraint(c)))
      .collect(),
    hints: p.hints.clone(),
    time_limit: p.time_limit,
    memory_limit: p.memory_limit,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{ProblemMeta, TestCase};

  fn problem() -> GeneratedProblem {
    GeneratedProblem {
      problem: ProblemMeta {
        id: "p-7".into(),
        title: "Longest Substring".into(),
        description: "Find the **longest** substring without repeats.".into(),
        difficulty: "Hard".into(),
        category: "Sliding Window".into(),
        tags: vec!["string".into()],
        constraints: vec!["0 <= s.length <= 5 * 10^4".into(), "s consists of ASCII.".into()],
      },
      test_cases: vec![
        TestCase { input: "abcabcbb".into(), expected_output: "3".into(), is_hidden: false },
        TestCase { input: "secret".into(), expected_output: "6".into(), is_hidden: true },
      ],
      solution_templates: vec![],
      hints: vec!["Use a sliding window.".into()],
      time_limit: 2.0,
      memory_limit: 128.0,
    }
  }

  #[test]
  fn badge_has_fixed_tier_styles() {
    assert_eq!(badge("easy").class, "bg-green-100 text-green-800 border-green-200");
    assert_eq!(badge("MEDIUM").class, "bg-orange-100 text-orange-800 border-orange-200");
    assert_eq!(badge("Hard").class, "bg-red-100 text-red-800 border-red-200");
  }

  #[test]
  fn unknown_difficulty_renders_unstyled() {
    let b = badge("brutal");
    assert_eq!(b.label, "Brutal");
    assert_eq!(b.class, "");
  }

  #[test]
  fn constraints_become_sentences() {
    assert_eq!(normalize_constraint("the input fits in memory"), "The input fits in memory.");
    assert_eq!(normalize_constraint("Already a sentence."), "Already a sentence.");
  }

  #[test]
  fn view_hides_hidden_cases_and_renders_markdown() {
    let view = problem_view(&problem());

    assert_eq!(view.examples.len(), 1);
    assert!(view.examples[0].block_html.contains("Input: abcabcbb"));
    assert!(!format!("{:?}", view.examples).contains("secret"));

    assert!(view.description_html.contains("<strong>longest</strong>"));
    assert_eq!(view.constraints_html.len(), 2);
    assert!(view.constraints_html[0].contains("0 &lt;= s.length"));
    assert_eq!(view.difficulty.label, "Hard");
    assert_eq!(view.hints, vec!["Use a sliding window.".to_string()]);
  }

  #[test]
  fn latex_spans_survive_markdown_rendering() {
    let html = markdown_html(r"The answer is $O(n \log n)$ time.");
    assert!(html.contains(r"O(n \log n)"));
  }
}
