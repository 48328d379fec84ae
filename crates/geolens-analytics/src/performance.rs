//! Cross-run statistics for every query known to a project.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use geolens_core::{AnalysisRun, Citation, QueryResult};
use serde::Serialize;

use crate::aggregate::{aggregate_runs, QueryHistory};
use crate::stats::{percent, summarize_positions, SentimentCounts};

/// Runs included in a query's `trend_data`.
pub const TREND_DATA_RUNS: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct PerformanceInput<'a> {
    pub brand: &'a str,
    pub competitors: &'a [String],
    pub runs: &'a [AnalysisRun],
    pub results: &'a [QueryResult],
    pub tracked: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorStat {
    pub appearances: u32,
    pub avg_position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPerformance {
    pub query: String,
    pub is_tracked: bool,
    pub total_runs: u32,
    /// Raw number of brand rows.
    pub appearances: u32,
    pub appearance_rate: u32,
    pub avg_position: f64,
    pub best_position: u32,
    pub worst_position: u32,
    pub sentiment: SentimentCounts,
    pub competitors: BTreeMap<String, CompetitorStat>,
    /// 1 when the brand appeared, oldest to newest, last [`TREND_DATA_RUNS`] runs.
    pub trend_data: Vec<u8>,
    pub citations: Vec<Citation>,
    pub used_web_search: bool,
}

impl QueryPerformance {
    fn from_history(history: &QueryHistory) -> Self {
        let positions = summarize_positions(&history.brand_positions());
        let competitors = history
            .competitor_tallies()
            .into_iter()
            .map(|tally| {
                let avg_position = summarize_positions(&tally.positions).avg;
                (
                    tally.name,
                    CompetitorStat {
                        appearances: to_u32(tally.appearances),
                        avg_position,
                    },
                )
            })
            .collect();

        let sequence = history.appearance_sequence();
        let trend_data = sequence[sequence.len().saturating_sub(TREND_DATA_RUNS)..]
            .iter()
            .map(|appeared| u8::from(*appeared))
            .collect();

        Self {
            query: history.query.clone(),
            is_tracked: history.is_tracked,
            total_runs: to_u32(history.total_runs()),
            appearances: to_u32(history.brand_mentions()),
            appearance_rate: percent(history.runs_with_brand(), history.total_runs()),
            avg_position: positions.avg,
            best_position: positions.best,
            worst_position: positions.worst,
            sentiment: history.sentiment(),
            competitors,
            trend_data,
            citations: history.citations.clone(),
            used_web_search: history.used_web_search,
        }
    }
}

/// Per-query performance, best performers first.
///
/// Queries with at least one brand appearance come first, sorted by raw
/// appearance count then appearance rate, both descending. Queries the brand
/// never appeared in follow in their original order, with tracked-but-never-run
/// queries last.
#[must_use]
pub fn aggregate_query_performance(input: &PerformanceInput<'_>) -> Vec<QueryPerformance> {
    let mut rows: Vec<QueryPerformance> = aggregate_runs(
        input.runs,
        input.results,
        input.brand,
        input.competitors,
        input.tracked,
    )
    .iter()
    .map(QueryPerformance::from_history)
    .collect();

    rows.sort_by(compare_performance);
    rows
}

fn compare_performance(a: &QueryPerformance, b: &QueryPerformance) -> Ordering {
    match (a.appearances == 0, b.appearances == 0) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b
            .appearances
            .cmp(&a.appearances)
            .then(b.appearance_rate.cmp(&a.appearance_rate)),
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "performance_test.rs"]
mod tests;
