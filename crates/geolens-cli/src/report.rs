//! Read-only commands: each loads a project's history and runs one read model.

use std::path::Path;

use anyhow::Context;
use geolens_analytics::{
    aggregate_query_performance, analyze_query_trend, build_dashboard_summary,
    mentions_from_results, suggest_queries, DashboardInput, DashboardSummary, NoIdeaSource,
    PerformanceInput, QueryIdeaSource, QueryPerformance, QuerySuggestion, QueryTrendAnalysis,
    StaticIdeaSource, SuggestionInput,
};
use geolens_core::ProjectConfig;
use geolens_store::HistoryStore;

pub(crate) fn dashboard(
    project: &ProjectConfig,
    store: &impl HistoryStore,
) -> anyhow::Result<DashboardSummary> {
    let results = store.results(project.id)?;
    let snapshots = store.snapshots(project.id)?;
    let mentions = mentions_from_results(&results);
    Ok(build_dashboard_summary(&DashboardInput {
        brand: &project.brand,
        competitors: &project.competitors,
        mentions: &mentions,
        snapshots: &snapshots,
        query_universe: None,
    }))
}

pub(crate) fn performance(
    project: &ProjectConfig,
    store: &impl HistoryStore,
) -> anyhow::Result<Vec<QueryPerformance>> {
    let runs = store.runs(project.id)?;
    let results = store.results(project.id)?;
    let tracked = store.tracked_queries(project.id)?;
    Ok(aggregate_query_performance(&PerformanceInput {
        brand: &project.brand,
        competitors: &project.competitors,
        runs: &runs,
        results: &results,
        tracked: &tracked,
    }))
}

pub(crate) fn trend(
    project: &ProjectConfig,
    store: &impl HistoryStore,
    query: &str,
) -> anyhow::Result<QueryTrendAnalysis> {
    let runs = store.runs(project.id)?;
    let results = store.results(project.id)?;
    Ok(analyze_query_trend(
        query,
        &project.brand,
        &project.competitors,
        &runs,
        &results,
    ))
}

pub(crate) fn suggest(
    project: &ProjectConfig,
    store: &impl HistoryStore,
    ideas: Option<&Path>,
) -> anyhow::Result<Vec<QuerySuggestion>> {
    let runs = store.runs(project.id)?;
    let results = store.results(project.id)?;
    let tracked = store.tracked_queries(project.id)?;
    let source: Box<dyn QueryIdeaSource> = match ideas {
        Some(path) => Box::new(read_ideas(path)?),
        None => Box::new(NoIdeaSource),
    };
    Ok(suggest_queries(
        &SuggestionInput {
            brand: &project.brand,
            competitors: &project.competitors,
            keywords: &project.keywords,
            runs: &runs,
            results: &results,
            tracked: &tracked,
        },
        source.as_ref(),
    ))
}

fn read_ideas(path: &Path) -> anyhow::Result<StaticIdeaSource> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read ideas from {}", path.display()))?;
    let ideas: Vec<String> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of strings", path.display()))?;
    tracing::debug!(count = ideas.len(), "loaded query ideas");
    Ok(StaticIdeaSource::new(ideas))
}
