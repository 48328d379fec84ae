use std::path::{Path, PathBuf};

use geolens_core::{AnalysisRun, ProjectSnapshot, QueryResult};
use uuid::Uuid;

use crate::{HistoryStore, MemoryStore, StoreError};

/// A [`MemoryStore`] backed by one JSON document on disk.
///
/// Reads and writes go to memory; nothing reaches the file until
/// [`HistoryFile::save`].
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
    store: MemoryStore,
}

impl HistoryFile {
    /// Load the history at `path`. A missing file is an empty history.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Json`] if it is not a valid history document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let store = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "history file not found; starting empty");
                MemoryStore::new()
            }
            Err(e) => return Err(io_error(&path, e)),
        };
        Ok(Self { path, store })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// See [`MemoryStore::register_project`].
    pub fn register_project(&mut self, project_id: Uuid, tracked_queries: Vec<String>) {
        self.store.register_project(project_id, tracked_queries);
    }

    /// Write the whole history back, creating parent directories as needed.
    ///
    /// The document is written to a sibling temporary file and renamed over
    /// the target.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if any filesystem step fails.
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.store)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| io_error(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e))?;
        tracing::info!(path = %self.path.display(), "saved history");
        Ok(())
    }
}

impl HistoryStore for HistoryFile {
    fn runs(&self, project_id: Uuid) -> Result<Vec<AnalysisRun>, StoreError> {
        self.store.runs(project_id)
    }

    fn results(&self, project_id: Uuid) -> Result<Vec<QueryResult>, StoreError> {
        self.store.results(project_id)
    }

    fn snapshots(&self, project_id: Uuid) -> Result<Vec<ProjectSnapshot>, StoreError> {
        self.store.snapshots(project_id)
    }

    fn tracked_queries(&self, project_id: Uuid) -> Result<Vec<String>, StoreError> {
        self.store.tracked_queries(project_id)
    }

    fn record_run(
        &mut self,
        run: AnalysisRun,
        results: Vec<QueryResult>,
        snapshot: ProjectSnapshot,
    ) -> Result<(), StoreError> {
        self.store.record_run(run, results, snapshot)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
