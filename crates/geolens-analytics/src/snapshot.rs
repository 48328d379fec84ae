//! Per-run summary captured when a run completes.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use geolens_core::{AnalysisRun, ProjectSnapshot, QueryResult};

use crate::stats::percent;

/// Summarize `run` from its rows. Rows of other runs are ignored.
///
/// Mention counts are distinct queries, not rows. A run without rows falls
/// back to `queries_generated` for its query total.
#[must_use]
pub fn build_snapshot(
    run: &AnalysisRun,
    results: &[QueryResult],
    brand: &str,
    competitors: &[String],
    date: NaiveDate,
) -> ProjectSnapshot {
    let rows: Vec<&QueryResult> = results.iter().filter(|r| r.run_id == run.id).collect();

    let mut seen = HashSet::new();
    let analyzed_queries: Vec<String> = rows
        .iter()
        .map(|r| r.query_text.as_str())
        .filter(|q| seen.insert(*q))
        .map(str::to_string)
        .collect();

    let total = if analyzed_queries.is_empty() {
        run.queries_generated as usize
    } else {
        analyzed_queries.len()
    };

    let queries_with_mentions = distinct_queries(&rows, |r| !r.is_marker());
    let brand_mentions = distinct_queries(&rows, |r| r.mentions(brand));
    let competitor_shares: BTreeMap<String, u32> = competitors
        .iter()
        .map(|c| (c.clone(), percent(distinct_queries(&rows, |r| r.mentions(c)), total)))
        .collect();

    tracing::debug!(
        run_id = %run.id,
        total_queries = total,
        brand_mentions,
        "built run snapshot"
    );

    ProjectSnapshot {
        project_id: run.project_id,
        run_id: run.id,
        snapshot_date: date,
        total_queries: to_u32(total),
        queries_with_mentions: to_u32(queries_with_mentions),
        brand_mentions: to_u32(brand_mentions),
        brand_share_pct: percent(brand_mentions, total),
        competitor_shares,
        analyzed_queries,
    }
}

fn distinct_queries(rows: &[&QueryResult], pred: impl Fn(&QueryResult) -> bool) -> usize {
    rows.iter()
        .copied()
        .filter(|r| pred(*r))
        .map(|r| r.query_text.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
