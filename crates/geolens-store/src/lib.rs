//! Run history persistence for geolens.
//!
//! The engine never reaches into storage itself; callers load plain
//! collections through [`HistoryStore`] and pass them in.

mod file;
mod memory;

use geolens_core::{AnalysisRun, ProjectSnapshot, QueryResult};
use thiserror::Error;
use uuid::Uuid;

pub use file::HistoryFile;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history file I/O error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("history file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("project {0} is not registered")]
    UnknownProject(Uuid),
    #[error("run {0} is already recorded")]
    DuplicateRun(Uuid),
    #[error("snapshot for run {snapshot_run} does not belong to run {run}")]
    SnapshotMismatch { run: Uuid, snapshot_run: Uuid },
}

/// Read and append access to per-project run history.
///
/// Runs come back ordered by `run_at` ascending and snapshots by
/// `snapshot_date` ascending. Each run has exactly one snapshot.
pub trait HistoryStore {
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownProject`] if the project is not registered.
    fn runs(&self, project_id: Uuid) -> Result<Vec<AnalysisRun>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::UnknownProject`] if the project is not registered.
    fn results(&self, project_id: Uuid) -> Result<Vec<QueryResult>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::UnknownProject`] if the project is not registered.
    fn snapshots(&self, project_id: Uuid) -> Result<Vec<ProjectSnapshot>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::UnknownProject`] if the project is not registered.
    fn tracked_queries(&self, project_id: Uuid) -> Result<Vec<String>, StoreError>;

    /// Append a completed run with its rows and snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownProject`] for an unregistered project,
    /// [`StoreError::DuplicateRun`] if the run id is already stored, or
    /// [`StoreError::SnapshotMismatch`] if the snapshot names another run.
    fn record_run(
        &mut self,
        run: AnalysisRun,
        results: Vec<QueryResult>,
        snapshot: ProjectSnapshot,
    ) -> Result<(), StoreError>;
}
