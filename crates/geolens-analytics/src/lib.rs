//! Visibility analytics engine for geolens.
//!
//! Pure functions over already-materialized run history: mention
//! sanitization, dashboard summaries (share of voice, trend, gaps, actions,
//! sentiment), per-query performance, single-query trend analysis and
//! query suggestions. Nothing in this crate performs I/O or keeps state
//! between calls; identical inputs always produce identical outputs.

pub mod actions;
pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod gaps;
pub mod ideas;
pub mod ingest;
pub mod performance;
pub mod sanitize;
pub mod snapshot;
pub mod stats;
pub mod suggest;
pub mod trend;

#[cfg(test)]
mod test_support;

pub use actions::{recommend_actions, ActionInputs, MAX_ACTIONS};
pub use aggregate::{aggregate_runs, CompetitorTally, QueryHistory, QueryRun};
pub use dashboard::{
    build_dashboard_summary, DashboardInput, DashboardSummary, SummaryCard, TrendCard, TrendPoint,
};
pub use error::IdeaSourceError;
pub use gaps::{classify_gaps, detect_gaps, Gap, GapKind, MAX_GAPS};
pub use ideas::{template_queries, IdeaRequest, NoIdeaSource, QueryIdeaSource, StaticIdeaSource};
pub use ingest::{mentions_from_results, results_from_outcomes};
pub use performance::{aggregate_query_performance, CompetitorStat, PerformanceInput, QueryPerformance};
pub use sanitize::{sanitize_mentions, BrandAllowList};
pub use snapshot::build_snapshot;
pub use stats::{OnlineMean, SentimentCounts};
pub use suggest::{suggest_queries, QuerySuggestion, SuggestionInput, SuggestionKind, MAX_SUGGESTIONS};
pub use trend::{
    analyze_query_trend, trend_direction, CompetitorTrend, QueryTrendAnalysis, RunDetail,
    TrendDirection, TrendStats,
};
