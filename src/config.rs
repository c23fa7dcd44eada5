//! Application configuration: one explicit `AppConfig` built at startup and
//! handed to every component that needs it.
//!
//! Sources, in order: built-in defaults, an optional TOML file pointed to by
//! JUDGE_CONFIG_PATH, then env overrides (PORT, GENERATOR_BASE_URL,
//! STORAGE_PATH). Nothing reads the environment after startup.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
  pub server: ServerConfig,
  pub generator: GeneratorConfig,
  pub storage: StorageConfig,
  pub workspace: WorkspaceConfig,
  pub request: RequestDefaults,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub port: u16,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self { port: 3000 }
  }
}

/// Where and how to reach the problem generator service.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
  pub base_url: String,
  pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self { base_url: "http://127.0.0.1:8000".into(), timeout_secs: 30 }
  }
}

/// Location of the local storage file holding in-progress work.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
  pub path: PathBuf,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self { path: PathBuf::from("./data/storage.json") }
  }
}

/// Catalogs for the generation form plus the editor's fallback language.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
  pub default_language: String,
  pub languages: Vec<String>,
  pub topics: Vec<String>,
  pub difficulties: Vec<String>,
}

impl Default for WorkspaceConfig {
  fn default() -> Self {
    Self {
      default_language: "Python".into(),
      languages: vec![
        "Python".into(),
        "Java".into(),
        "C++".into(),
        "JavaScript".into(),
        "TypeScript".into(),
      ],
      topics: vec![
        "Tries".into(),
        "Arrays & Hashing".into(),
        "Two Pointers".into(),
        "Stack".into(),
        "Binary Search".into(),
        "Sliding Window".into(),
        "Linked List".into(),
        "Heap / Priority Queue".into(),
        "Trees".into(),
        "Intervals".into(),
        "Greedy".into(),
        "Advanced Graphs".into(),
        "Graphs".into(),
        "Backtracking".into(),
        "1-D DP".into(),
        "2-D DP".into(),
        "Bit Manipulation".into(),
        "Math & Geometry".into(),
      ],
      difficulties: vec!["easy".into(), "medium".into(), "hard".into()],
    }
  }
}

/// Values used for request fields the caller leaves out.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
  pub difficulty: String,
  pub category: String,
  pub num_test_cases: u32,
  pub languages: Vec<String>,
  pub time_limit: f64,
  pub memory_limit: f64,
}

impl Default for RequestDefaults {
  fn default() -> Self {
    Self {
      difficulty: "medium".into(),
      category: "Sorting".into(),
      num_test_cases: 3,
      languages: vec!["Python".into()],
      time_limit: 1.0,
      memory_limit: 256.0,
    }
  }
}

impl AppConfig {
  /// Load configuration: TOML file if JUDGE_CONFIG_PATH is set, defaults
  /// otherwise, then env overrides on top. On any parsing/IO error the file
  /// is ignored and defaults are used.
  pub fn load() -> Self {
    let mut cfg = match std::env::var("JUDGE_CONFIG_PATH") {
      Ok(path) => match std::fs::read_to_string(&path) {
        Ok(s) => match toml::from_str::<AppConfig>(&s) {
          Ok(cfg) => {
            info!(target: "judge_backend", %path, "Loaded config (TOML)");
            cfg
          }
          Err(e) => {
            error!(target: "judge_backend", %path, error = %e, "Failed to parse TOML config; using defaults");
            AppConfig::default()
          }
        },
        Err(e) => {
          error!(target: "judge_backend", %path, error = %e, "Failed to read TOML config file; using defaults");
          AppConfig::default()
        }
      },
      Err(_) => AppConfig::default(),
    };

    if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
      cfg.server.port = port;
    }
    if let Ok(url) = std::env::var("GENERATOR_BASE_URL") {
      cfg.generator.base_url = url;
    }
    if let Ok(path) = std::env::var("STORAGE_PATH") {
      cfg.storage.path = PathBuf::from(path);
    }

    cfg
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_toml_keeps_defaults_elsewhere() {
    let cfg: AppConfig = toml::from_str(
      r#"
      [generator]
      base_url = "http://generator.internal:9000"

      [workspace]
      default_language = "Java"
      "#,
    )
    .unwrap();

    assert_eq!(cfg.generator.base_url, "http://generator.internal:9000");
    assert_eq!(cfg.generator.timeout_secs, 30);
    assert_eq!(cfg.workspace.default_language, "Java");
    assert_eq!(cfg.server.port, 3000);
    assert_eq!(cfg.request.num_test_cases, 3);
    assert_eq!(cfg.request.languages, vec!["Python".to_string()]);
  }

  #[test]
  fn empty_toml_is_all_defaults() {
    let cfg: AppConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.storage.path, PathBuf::from("./data/storage.json"));
    assert_eq!(cfg.workspace.languages.len(), 5);
    assert_eq!(cfg.workspace.topics.len(), 18);
    assert_eq!(cfg.workspace.difficulties, vec!["easy", "medium", "hard"]);
  }
}
