use std::collections::{BTreeMap, HashSet};

use geolens_core::{AnalysisRun, ProjectSnapshot, QueryResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{HistoryStore, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectHistory {
    #[serde(default)]
    tracked_queries: Vec<String>,
    #[serde(default)]
    runs: Vec<AnalysisRun>,
    #[serde(default)]
    results: Vec<QueryResult>,
    #[serde(default)]
    snapshots: Vec<ProjectSnapshot>,
}

/// History held entirely in memory, keyed by project id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    projects: BTreeMap<Uuid, ProjectHistory>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `project_id`, replacing its tracked queries. Existing history
    /// is kept.
    pub fn register_project(&mut self, project_id: Uuid, tracked_queries: Vec<String>) {
        self.projects.entry(project_id).or_default().tracked_queries = tracked_queries;
    }

    #[must_use]
    pub fn is_registered(&self, project_id: Uuid) -> bool {
        self.projects.contains_key(&project_id)
    }

    fn project(&self, project_id: Uuid) -> Result<&ProjectHistory, StoreError> {
        self.projects
            .get(&project_id)
            .ok_or(StoreError::UnknownProject(project_id))
    }

    fn contains_run(&self, run_id: Uuid) -> bool {
        self.projects
            .values()
            .any(|p| p.runs.iter().any(|r| r.id == run_id))
    }
}

impl HistoryStore for MemoryStore {
    fn runs(&self, project_id: Uuid) -> Result<Vec<AnalysisRun>, StoreError> {
        let mut runs = self.project(project_id)?.runs.clone();
        runs.sort_by_key(|r| r.run_at);
        Ok(runs)
    }

    fn results(&self, project_id: Uuid) -> Result<Vec<QueryResult>, StoreError> {
        Ok(self.project(project_id)?.results.clone())
    }

    fn snapshots(&self, project_id: Uuid) -> Result<Vec<ProjectSnapshot>, StoreError> {
        let mut snapshots = self.project(project_id)?.snapshots.clone();
        snapshots.sort_by_key(|s| s.snapshot_date);
        Ok(snapshots)
    }

    fn tracked_queries(&self, project_id: Uuid) -> Result<Vec<String>, StoreError> {
        Ok(self.project(project_id)?.tracked_queries.clone())
    }

    fn record_run(
        &mut self,
        run: AnalysisRun,
        results: Vec<QueryResult>,
        snapshot: ProjectSnapshot,
    ) -> Result<(), StoreError> {
        if snapshot.run_id != run.id {
            return Err(StoreError::SnapshotMismatch {
                run: run.id,
                snapshot_run: snapshot.run_id,
            });
        }
        if self.contains_run(run.id) {
            return Err(StoreError::DuplicateRun(run.id));
        }
        let history = self
            .projects
            .get_mut(&run.project_id)
            .ok_or(StoreError::UnknownProject(run.project_id))?;

        let foreign: HashSet<Uuid> = results
            .iter()
            .map(|r| r.run_id)
            .filter(|id| *id != run.id)
            .collect();
        if !foreign.is_empty() {
            tracing::warn!(
                run_id = %run.id,
                foreign_runs = foreign.len(),
                "recorded rows reference other runs"
            );
        }

        tracing::debug!(
            project_id = %run.project_id,
            run_id = %run.id,
            rows = results.len(),
            "recorded run"
        );
        history.results.extend(results);
        history.snapshots.push(snapshot);
        history.runs.push(run);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn run(project_id: Uuid, day: u32) -> AnalysisRun {
        AnalysisRun {
            id: Uuid::new_v4(),
            project_id,
            run_at: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
            queries_generated: 1,
        }
    }

    fn snapshot(run: &AnalysisRun, day: u32) -> ProjectSnapshot {
        ProjectSnapshot {
            project_id: run.project_id,
            run_id: run.id,
            snapshot_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            total_queries: 1,
            queries_with_mentions: 0,
            brand_mentions: 0,
            brand_share_pct: 0,
            competitor_shares: BTreeMap::new(),
            analyzed_queries: vec!["q".to_string()],
        }
    }

    fn store_with_project() -> (MemoryStore, Uuid) {
        let project_id = Uuid::new_v4();
        let mut store = MemoryStore::new();
        store.register_project(project_id, vec!["best crm".to_string()]);
        (store, project_id)
    }

    #[test]
    fn runs_and_snapshots_come_back_in_order() {
        let (mut store, project_id) = store_with_project();
        for day in [9, 2, 5] {
            let r = run(project_id, day);
            let s = snapshot(&r, day);
            let rows = vec![QueryResult::marker(r.id, "q")];
            store.record_run(r, rows, s).unwrap();
        }

        let days: Vec<String> = store
            .runs(project_id)
            .unwrap()
            .iter()
            .map(|r| r.run_at.format("%d").to_string())
            .collect();
        assert_eq!(days, vec!["02", "05", "09"]);

        let dates: Vec<u32> = store
            .snapshots(project_id)
            .unwrap()
            .iter()
            .map(|s| chrono::Datelike::day(&s.snapshot_date))
            .collect();
        assert_eq!(dates, vec![2, 5, 9]);
        assert_eq!(store.results(project_id).unwrap().len(), 3);
    }

    #[test]
    fn duplicate_run_is_rejected() {
        let (mut store, project_id) = store_with_project();
        let r = run(project_id, 1);
        let s = snapshot(&r, 1);
        store.record_run(r.clone(), Vec::new(), s.clone()).unwrap();

        let err = store.record_run(r, Vec::new(), s).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateRun(_)));
        assert_eq!(store.runs(project_id).unwrap().len(), 1);
    }

    #[test]
    fn snapshot_must_match_run() {
        let (mut store, project_id) = store_with_project();
        let r = run(project_id, 1);
        let other = run(project_id, 2);
        let err = store
            .record_run(r, Vec::new(), snapshot(&other, 2))
            .unwrap_err();
        assert!(matches!(err, StoreError::SnapshotMismatch { .. }));
    }

    #[test]
    fn unknown_project_is_an_error() {
        let store = MemoryStore::new();
        let err = store.runs(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::UnknownProject(_)));

        let mut store = MemoryStore::new();
        let r = run(Uuid::new_v4(), 1);
        let s = snapshot(&r, 1);
        assert!(matches!(
            store.record_run(r, Vec::new(), s),
            Err(StoreError::UnknownProject(_))
        ));
    }

    #[test]
    fn re_registering_keeps_history() {
        let (mut store, project_id) = store_with_project();
        let r = run(project_id, 1);
        let s = snapshot(&r, 1);
        store.record_run(r, Vec::new(), s).unwrap();

        store.register_project(project_id, vec!["new query".to_string()]);
        assert_eq!(store.tracked_queries(project_id).unwrap(), vec!["new query"]);
        assert_eq!(store.runs(project_id).unwrap().len(), 1);
    }
}
