//! Single-query deep dive across every run that executed it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use geolens_core::{AnalysisRun, QueryResult, Sentiment};
use serde::Serialize;
use uuid::Uuid;

use crate::aggregate::{aggregate_runs, QueryHistory, QueryRun};
use crate::stats::{percent, ratio, summarize_positions, SentimentCounts};

/// Fewer data points than this always read as [`TrendDirection::Stable`].
const MIN_TREND_POINTS: usize = 4;

/// Half-over-half change in appearance rate needed to call a direction.
const DIRECTION_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// What one run recorded for the analyzed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDetail {
    pub run_id: Uuid,
    pub run_at: Option<DateTime<Utc>>,
    pub appeared: bool,
    /// Best brand position in the run.
    pub position: Option<u32>,
    pub sentiment: Option<Sentiment>,
    pub context: Option<String>,
    /// Every configured competitor; `None` when absent or unranked.
    pub competitor_positions: BTreeMap<String, Option<u32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendStats {
    pub total_runs: u32,
    pub appearances: u32,
    pub appearance_rate: u32,
    pub avg_position: f64,
    pub best_position: u32,
    pub worst_position: u32,
    pub sentiment: SentimentCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorTrend {
    pub appearance_count: u32,
    pub avg_position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTrendAnalysis {
    pub query: String,
    pub runs: Vec<RunDetail>,
    pub stats: TrendStats,
    pub trend_direction: TrendDirection,
    pub competitors: BTreeMap<String, CompetitorTrend>,
}

/// Analyze `query` over every run that touched it, oldest first.
///
/// A query no run has executed yields an empty run list, zeroed stats and a
/// stable direction.
#[must_use]
pub fn analyze_query_trend(
    query: &str,
    brand: &str,
    competitors: &[String],
    runs: &[AnalysisRun],
    results: &[QueryResult],
) -> QueryTrendAnalysis {
    let history = aggregate_runs(runs, results, brand, competitors, &[])
        .into_iter()
        .find(|h| h.query == query);

    let Some(history) = history else {
        tracing::debug!(query, "no runs recorded for query");
        return QueryTrendAnalysis {
            query: query.to_string(),
            runs: Vec::new(),
            stats: stats_for(None),
            trend_direction: TrendDirection::Stable,
            competitors: competitors
                .iter()
                .map(|c| (c.clone(), CompetitorTrend::default()))
                .collect(),
        };
    };

    let details = history
        .runs
        .iter()
        .map(|run| run_detail(run, competitors))
        .collect();

    let tallies = history.competitor_tallies();
    let competitor_trends = competitors
        .iter()
        .map(|name| {
            let trend = tallies
                .iter()
                .find(|t| &t.name == name)
                .map_or_else(CompetitorTrend::default, |t| CompetitorTrend {
                    appearance_count: u32::try_from(t.appearances).unwrap_or(u32::MAX),
                    avg_position: summarize_positions(&t.positions).avg,
                });
            (name.clone(), trend)
        })
        .collect();

    QueryTrendAnalysis {
        query: history.query.clone(),
        runs: details,
        stats: stats_for(Some(&history)),
        trend_direction: trend_direction(&history.appearance_sequence()),
        competitors: competitor_trends,
    }
}

/// Compare the brand's appearance rate in the later half of `appeared`
/// against the earlier half.
///
/// The first half holds `floor(n / 2)` points. Fewer than four points is
/// always stable.
#[must_use]
pub fn trend_direction(appeared: &[bool]) -> TrendDirection {
    if appeared.len() < MIN_TREND_POINTS {
        return TrendDirection::Stable;
    }
    let (first, second) = appeared.split_at(appeared.len() / 2);
    let rate = |half: &[bool]| ratio(half.iter().filter(|a| **a).count(), half.len());
    let change = rate(second) - rate(first);

    if change > DIRECTION_THRESHOLD {
        TrendDirection::Up
    } else if change < -DIRECTION_THRESHOLD {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    }
}

fn run_detail(run: &QueryRun, competitors: &[String]) -> RunDetail {
    RunDetail {
        run_id: run.run_id,
        run_at: run.run_at,
        appeared: run.brand_appeared(),
        position: run.best_brand_position(),
        sentiment: run.brand_sentiments.first().copied(),
        context: run.brand_context.clone(),
        competitor_positions: competitors
            .iter()
            .map(|c| (c.clone(), run.competitor_position(c).flatten()))
            .collect(),
    }
}

fn stats_for(history: Option<&QueryHistory>) -> TrendStats {
    let Some(history) = history else {
        return TrendStats {
            total_runs: 0,
            appearances: 0,
            appearance_rate: 0,
            avg_position: 0.0,
            best_position: 0,
            worst_position: 0,
            sentiment: SentimentCounts::default(),
        };
    };
    let positions = summarize_positions(&history.brand_positions());
    let appearances = history.runs_with_brand();
    TrendStats {
        total_runs: u32::try_from(history.total_runs()).unwrap_or(u32::MAX),
        appearances: u32::try_from(appearances).unwrap_or(u32::MAX),
        appearance_rate: percent(appearances, history.total_runs()),
        avg_position: positions.avg,
        best_position: positions.best,
        worst_position: positions.worst,
        sentiment: history.sentiment(),
    }
}

#[cfg(test)]
#[path = "trend_test.rs"]
mod tests;
