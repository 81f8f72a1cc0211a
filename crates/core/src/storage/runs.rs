use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::errors::CoreError;
use crate::models::run::SimulationRun;
use super::document_store::{from_document, to_document, DocumentStore};

/// Collection holding finished runs, keyed by run / group id.
pub const RUNS_COLLECTION: &str = "simulation_runs";

/// Persists finished simulation runs through a [`DocumentStore`].
///
/// A run is written once, after completion, merged into any earlier
/// record for the same id. Fields outside the run itself (for example
/// notes added by other tools) survive the merge.
pub struct RunArchive;

impl RunArchive {
    pub fn new() -> Self {
        Self
    }

    pub async fn save(&self, store: &dyn DocumentStore, run: &SimulationRun) -> Result<(), CoreError> {
        let mut document = to_document(run)?;
        document.insert(
            "completedAt".into(),
            Value::String(Utc::now().to_rfc3339()),
        );
        store.merge(RUNS_COLLECTION, &run.run_id, document).await?;
        info!(
            run_id = %run.run_id,
            ticks = run.snapshots.len(),
            store = store.name(),
            "simulation run persisted"
        );
        Ok(())
    }

    /// Load a run back. `Ok(None)` if nothing is stored under `run_id`.
    pub async fn load(&self, store: &dyn DocumentStore, run_id: &str) -> Result<Option<SimulationRun>, CoreError> {
        match store.get(RUNS_COLLECTION, run_id).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }
}

impl Default for RunArchive {
    fn default() -> Self {
        Self::new()
    }
}
