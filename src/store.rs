//! Local persistence of in-progress work.
//!
//! This module owns the file-backed analog of the key-value storage the SPA
//! writes to: one flat JSON object on disk, a handful of fixed entry keys,
//! and synchronous writes that rewrite the whole map. Under the code entry
//! the map is two-level (problem id, then language), so identifiers may
//! contain any character without colliding.
//!
//! Reads are best-effort: a missing file, unreadable JSON, or a malformed
//! entry all degrade to "no cached value". Callers treat writes the same
//! way; losing a cached value never breaks the request/response flow.
//!
//! Entry keys and value shapes are stable across versions so a user's
//! in-progress work survives upgrades.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::domain::{GeneratedProblem, ProblemRequest};

/// Entry key for the code map: problem id, then language, then source code.
const CODE_KEY: &str = "judge-problem-code";
/// Entry key for the language map: problem id to last-selected language.
const LANGUAGE_KEY: &str = "judge-problem-language";
/// Entry key for the last-viewed problem, stored verbatim.
const PROBLEM_KEY: &str = "problem";
/// Entry key for the last-used generation settings.
const SETTINGS_KEY: &str = "problemSettings";

/// Failures of the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
  /// The storage file exists but could not be read or parsed.
  #[error("storage read failed at {path}: {reason}")]
  Read { path: PathBuf, reason: String },
  /// The storage file could not be written back.
  #[error("storage write failed at {path}: {reason}")]
  Write { path: PathBuf, reason: String },
}

/// File-backed flat key-value store.
///
/// Writers serialize on an internal lock: every write is a read-modify-write
/// of the whole map, and interleaving two of them would drop entries. Within
/// one process a read immediately after a write observes that write; across
/// processes the last writer wins.
pub struct LocalStore {
  path: PathBuf,
  lock: Mutex<()>,
}

impl LocalStore {
  /// Open a store rooted at `path`. The file is created lazily on first write.
  pub fn open(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), lock: Mutex::new(()) }
  }

  fn guard(&self) -> MutexGuard<'_, ()> {
    self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  // ---- raw flat map ----

  fn load(&self) -> Result<HashMap<String, Value>, StorageError> {
    let bytes = match fs::read(&self.path) {
      Ok(b) => b,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
      Err(e) => {
        return Err(StorageError::Read { path: self.path.clone(), reason: e.to_string() })
      }
    };
    serde_json::from_slice(&bytes)
      .map_err(|e| StorageError::Read { path: self.path.clone(), reason: e.to_string() })
  }

  /// Best-effort load: read failures degrade to an empty map.
  fn load_or_empty(&self) -> HashMap<String, Value> {
    match self.load() {
      Ok(map) => map,
      Err(e) => {
        warn!(target: "storage", error = %e, "Unreadable storage; treating as empty");
        HashMap::new()
      }
    }
  }

  fn persist(&self, map: &HashMap<String, Value>) -> Result<(), StorageError> {
    if let Some(parent) = self.path.parent() {
      if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)
          .map_err(|e| StorageError::Write { path: self.path.clone(), reason: e.to_string() })?;
      }
    }
    let bytes = serde_json::to_vec(map)
      .map_err(|e| StorageError::Write { path: self.path.clone(), reason: e.to_string() })?;
    fs::write(&self.path, bytes)
      .map_err(|e| StorageError::Write { path: self.path.clone(), reason: e.to_string() })
  }

  /// Decode one entry from an already-loaded map.
  fn entry_from<T: DeserializeOwned>(&self, map: &HashMap<String, Value>, key: &str) -> Option<T> {
    let value = map.get(key)?;
    match serde_json::from_value(value.clone()) {
      Ok(v) => Some(v),
      Err(e) => {
        warn!(target: "storage", key, error = %e, "Malformed storage entry; treating as absent");
        None
      }
    }
  }

  /// Read one entry under the lock.
  fn get_entry<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let _guard = self.guard();
    self.entry_from(&self.load_or_empty(), key)
  }

  /// Read-modify-write one entry as a single locked cycle.
  fn update_entry<T, F>(&self, key: &str, update: F) -> Result<(), StorageError>
  where
    T: DeserializeOwned + Serialize + Default,
    F: FnOnce(&mut T),
  {
    let _guard = self.guard();
    let mut map = self.load_or_empty();
    let mut entry: T = self.entry_from(&map, key).unwrap_or_default();
    update(&mut entry);
    let encoded = serde_json::to_value(&entry)
      .map_err(|e| StorageError::Write { path: self.path.clone(), reason: e.to_string() })?;
    map.insert(key.to_string(), encoded);
    self.persist(&map)
  }

  // ---- code map ----

  /// Saved source for `(problem_id, language)`, if any. An empty string is a
  /// present value (the user blanked the editor), not a miss.
  pub fn stored_code(&self, problem_id: &str, language: &str) -> Option<String> {
    let codes: HashMap<String, HashMap<String, String>> = self.get_entry(CODE_KEY)?;
    codes.get(problem_id)?.get(language).cloned()
  }

  /// Upsert source for `(problem_id, language)` and rewrite the map.
  pub fn store_code(&self, problem_id: &str, language: &str, code: &str) -> Result<(), StorageError> {
    self.update_entry(CODE_KEY, |codes: &mut HashMap<String, HashMap<String, String>>| {
      codes
        .entry(problem_id.to_string())
        .or_default()
        .insert(language.to_string(), code.to_string());
    })
  }

  // ---- language map ----

  /// Last-selected language for `problem_id`, if any.
  pub fn stored_language(&self, problem_id: &str) -> Option<String> {
    let languages: HashMap<String, String> = self.get_entry(LANGUAGE_KEY)?;
    languages.get(problem_id).cloned()
  }

  /// Upsert the language preference for `problem_id`.
  pub fn store_language(&self, problem_id: &str, language: &str) -> Result<(), StorageError> {
    self.update_entry(LANGUAGE_KEY, |languages: &mut HashMap<String, String>| {
      languages.insert(problem_id.to_string(), language.to_string());
    })
  }

  // ---- single-value entries ----

  /// The last-viewed problem, if one was stored and still decodes.
  pub fn last_problem(&self) -> Option<GeneratedProblem> {
    self.get_entry(PROBLEM_KEY)
  }

  /// Store the active problem verbatim for continuity across restarts.
  pub fn store_problem(&self, problem: &GeneratedProblem) -> Result<(), StorageError> {
    self.update_entry(PROBLEM_KEY, |entry: &mut Option<GeneratedProblem>| {
      *entry = Some(problem.clone());
    })
  }

  /// The last-used generation settings, if any.
  pub fn settings(&self) -> Option<ProblemRequest> {
    self.get_entry(SETTINGS_KEY)
  }

  /// Store the generation settings the user last submitted.
  pub fn store_settings(&self, request: &ProblemRequest) -> Result<(), StorageError> {
    self.update_entry(SETTINGS_KEY, |entry: &mut Option<ProblemRequest>| {
      *entry = Some(request.clone());
    })
  }
}
