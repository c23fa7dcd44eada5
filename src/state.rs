//! Shared application state: configuration, the generator client, the local
//! store, and the currently active problem.
//!
//! This module owns:
//!   - the generator HTTP client (built once from config)
//!   - the local store handle (write-through persistence)
//!   - the active problem, restored from storage at startup
//!   - the generation counter that orders overlapping requests
//!
//! The counter implements a simple rule: a response is committed only if no
//! newer generation started while it was in flight, so a stale response can
//! never overwrite newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::domain::GeneratedProblem;
use crate::generator::{GeneratorError, ProblemGenerator};
use crate::store::LocalStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub generator: ProblemGenerator,
    pub store: Arc<LocalStore>,
    current: Arc<RwLock<Option<GeneratedProblem>>>,
    generation: Arc<AtomicU64>,
}

impl AppState {
    /// Build state from configuration: HTTP client, local store, and the
    /// last-viewed problem restored for session continuity.
    #[instrument(level = "info", skip_all)]
    pub fn new(config: AppConfig) -> Result<Self, GeneratorError> {
        let generator = ProblemGenerator::new(&config.generator)?;
        let store = Arc::new(LocalStore::open(&config.storage.path));

        let current = store.last_problem();
        match &current {
            Some(p) => {
                info!(target: "problem", id = %p.id(), "Restored last-viewed problem from storage")
            }
            None => info!(target: "problem", "No stored problem; starting empty"),
        }

        Ok(Self {
            config,
            generator,
            store,
            current: Arc::new(RwLock::new(current)),
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Start a generation attempt and get its ticket.
    pub fn begin_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commit a response if `ticket` still belongs to the latest attempt.
    /// Returns false when a newer attempt started in the meantime.
    pub async fn commit_generation(&self, ticket: u64, problem: GeneratedProblem) -> bool {
        let mut current = self.current.write().await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            warn!(target: "problem", id = %problem.id(), ticket, "Dropping stale generation response");
            return false;
        }

        if let Err(e) = self.store.store_problem(&problem) {
            warn!(target: "storage", error = %e, "Could not persist generated problem");
        }
        *current = Some(problem);
        true
    }

    /// The currently active problem, if any.
    pub async fn current_problem(&self) -> Option<GeneratedProblem> {
        self.current.read().await.clone()
    }

    /// Look up a problem by id: the active one, or the stored last-viewed
    /// problem when the process was restarted in between.
    pub async fn problem_by_id(&self, id: &str) -> Option<GeneratedProblem> {
        if let Some(p) = self.current.read().await.as_ref() {
            if p.id() == id {
                return Some(p.clone());
            }
        }
        self.store.last_problem().filter(|p| p.id() == id)
    }
}
