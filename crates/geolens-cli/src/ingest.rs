//! Recording a run from collected LLM outcomes.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use geolens_analytics::{build_snapshot, results_from_outcomes, BrandAllowList};
use geolens_core::{AnalysisRun, ProjectConfig, ProjectSnapshot, QueryOutcome};
use geolens_store::HistoryStore;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IngestReceipt {
    pub run_id: Uuid,
    pub rows: usize,
    pub snapshot: ProjectSnapshot,
}

pub(crate) fn read_outcomes(path: &Path) -> anyhow::Result<Vec<QueryOutcome>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read outcomes from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of query outcomes", path.display()))
}

/// Sanitize `outcomes` into rows, snapshot them and append the run to `store`.
pub(crate) fn record(
    project: &ProjectConfig,
    store: &mut impl HistoryStore,
    outcomes: Vec<QueryOutcome>,
    run_at: DateTime<Utc>,
) -> anyhow::Result<IngestReceipt> {
    let run = AnalysisRun {
        id: Uuid::new_v4(),
        project_id: project.id,
        run_at,
        queries_generated: u32::try_from(outcomes.len()).unwrap_or(u32::MAX),
    };
    let allow = BrandAllowList::for_brand(&project.brand, &project.competitors);
    let rows = results_from_outcomes(run.id, outcomes, &allow);
    let snapshot = build_snapshot(
        &run,
        &rows,
        &project.brand,
        &project.competitors,
        run_at.date_naive(),
    );

    let receipt = IngestReceipt {
        run_id: run.id,
        rows: rows.len(),
        snapshot: snapshot.clone(),
    };
    store
        .record_run(run, rows, snapshot)
        .with_context(|| format!("failed to record run for project '{}'", project.name))?;
    tracing::info!(
        project = %project.slug(),
        run_id = %receipt.run_id,
        rows = receipt.rows,
        "ingested run"
    );
    Ok(receipt)
}
