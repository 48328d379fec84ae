//! Recommendations for untracked queries worth monitoring.
//!
//! With history, every observed query is scored into one of three pools
//! (zero visibility, competitor gap, high performer). Queries already tracked
//! are dropped, and a thin result is topped up from the idea source. Without
//! history the idea source, or failing that the keyword templates, provides
//! every suggestion.

use std::cmp::Ordering;
use std::collections::HashSet;

use geolens_core::{AnalysisRun, QueryResult};
use serde::Serialize;

use crate::aggregate::{aggregate_runs, CompetitorTally, QueryHistory};
use crate::ideas::{template_queries, IdeaRequest, QueryIdeaSource};
use crate::stats::{ratio, OnlineMean};

pub const MAX_SUGGESTIONS: usize = 10;

/// Below this many untracked scored suggestions the idea source is consulted.
const MIN_SCORED: usize = 5;

/// Below this many distinct queries in history the idea source is consulted.
const MIN_HISTORY_QUERIES: usize = 3;

const ZERO_VISIBILITY_BASE: f64 = 90.0;
const COMPETITOR_GAP_BASE: f64 = 60.0;
const COMPETITOR_GAP_MAX_BONUS: f64 = 20.0;
const HIGH_PERFORMER_BASE: f64 = 40.0;
const HIGH_PERFORMER_MIN_RATE: f64 = 60.0;
const HIGH_PERFORMER_MAX_POSITION: f64 = 3.0;
const AI_LADDER_START: f64 = 55.0;
const AI_LADDER_STEP: f64 = 2.0;
const TEMPLATE_SCORES: [f64; 5] = [50.0, 45.0, 40.0, 35.0, 30.0];

const AI_REASON: &str = "AI-generated suggestion based on your brand and competitors.";
const TEMPLATE_REASON: &str =
    "Run your first analysis to see how AI assistants answer this query.";

#[derive(Debug, Clone, Copy)]
pub struct SuggestionInput<'a> {
    pub brand: &'a str,
    pub competitors: &'a [String],
    /// Seed keywords for templates; the brand is used when empty.
    pub keywords: &'a [String],
    pub runs: &'a [AnalysisRun],
    pub results: &'a [QueryResult],
    pub tracked: &'a [String],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    ZeroVisibility,
    CompetitorGap,
    HighPerformer,
    AiGenerated,
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySuggestion {
    pub query: String,
    pub score: f64,
    pub reason: String,
    pub kind: SuggestionKind,
}

/// Up to [`MAX_SUGGESTIONS`] untracked queries, highest score first.
///
/// Idea source failures are logged and treated as "no ideas".
#[must_use]
pub fn suggest_queries(
    input: &SuggestionInput<'_>,
    source: &dyn QueryIdeaSource,
) -> Vec<QuerySuggestion> {
    if input.runs.is_empty() {
        return first_run_suggestions(input, source);
    }

    let histories = aggregate_runs(
        input.runs,
        input.results,
        input.brand,
        input.competitors,
        &[],
    );

    let tracked: HashSet<&str> = input.tracked.iter().map(String::as_str).collect();
    let mut suggestions: Vec<QuerySuggestion> = Vec::new();
    for history in &histories {
        for candidate in score_query(input.brand, history) {
            if tracked.contains(candidate.query.as_str()) {
                continue;
            }
            keep_best(&mut suggestions, candidate);
        }
    }

    if suggestions.len() < MIN_SCORED || histories.len() < MIN_HISTORY_QUERIES {
        let produced: Vec<String> = suggestions.iter().map(|s| s.query.clone()).collect();
        let ideas = ai_suggestions(input, source, &produced);
        tracing::debug!(
            scored = suggestions.len(),
            history_queries = histories.len(),
            ideas = ideas.len(),
            "supplemented suggestions from idea source"
        );
        suggestions.extend(ideas);
    }

    suggestions.sort_by(by_score_desc);
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn first_run_suggestions(
    input: &SuggestionInput<'_>,
    source: &dyn QueryIdeaSource,
) -> Vec<QuerySuggestion> {
    let ideas = ai_suggestions(input, source, &[]);
    if !ideas.is_empty() {
        return ideas;
    }
    template_queries(
        input.keywords,
        input.brand,
        input.tracked,
        TEMPLATE_SCORES.len(),
    )
    .into_iter()
    .zip(TEMPLATE_SCORES)
    .map(|(query, score)| QuerySuggestion {
        query,
        score,
        reason: TEMPLATE_REASON.to_string(),
        kind: SuggestionKind::Template,
    })
    .collect()
}

/// Ideas from `source` not already tracked or produced, on the fixed ladder.
fn ai_suggestions(
    input: &SuggestionInput<'_>,
    source: &dyn QueryIdeaSource,
    produced: &[String],
) -> Vec<QuerySuggestion> {
    let exclude: Vec<String> = input.tracked.iter().chain(produced).cloned().collect();
    let request = IdeaRequest {
        brand: input.brand,
        competitors: input.competitors,
        keywords: input.keywords,
        exclude: &exclude,
        count: MAX_SUGGESTIONS,
    };
    let ideas = match source.ideas(&request) {
        Ok(ideas) => ideas,
        Err(err) => {
            tracing::warn!(error = %err, "query idea source failed; continuing without ideas");
            return Vec::new();
        }
    };

    let mut seen: HashSet<String> = exclude.iter().map(|q| q.trim().to_lowercase()).collect();
    ideas
        .into_iter()
        .map(|idea| idea.trim().to_string())
        .filter(|idea| !idea.is_empty() && seen.insert(idea.to_lowercase()))
        .take(MAX_SUGGESTIONS)
        .zip(0_u32..)
        .map(|(query, rank)| QuerySuggestion {
            query,
            score: AI_LADDER_START - AI_LADDER_STEP * f64::from(rank),
            reason: AI_REASON.to_string(),
            kind: SuggestionKind::AiGenerated,
        })
        .collect()
}

/// Every pool `history` qualifies for.
fn score_query(brand: &str, history: &QueryHistory) -> Vec<QuerySuggestion> {
    let total_runs = history.total_runs();
    if total_runs == 0 {
        return Vec::new();
    }
    let tallies = history.competitor_tallies();
    let brand_runs = history.runs_with_brand();
    let query = &history.query;

    if brand_runs == 0 {
        let competitor_runs: usize = tallies.iter().map(|t| t.appearances).sum();
        let strength = ratio(competitor_runs, total_runs);
        let reason = match strongest(&tallies) {
            Some(top) => format!(
                "{} appears in {} of {total_runs} runs while {brand} is never mentioned.",
                top.name, top.appearances
            ),
            None => format!("Critical gap: neither {brand} nor any competitor is mentioned."),
        };
        return vec![QuerySuggestion {
            query: query.clone(),
            score: ZERO_VISIBILITY_BASE + (strength * 10.0).min(10.0),
            reason,
            kind: SuggestionKind::ZeroVisibility,
        }];
    }

    let mut candidates = Vec::new();
    let brand_rate = ratio(brand_runs, total_runs) * 100.0;

    if let Some(rival) = tallies.iter().find(|t| t.appearances > brand_runs) {
        let rival_rate = ratio(rival.appearances, total_runs) * 100.0;
        let gap = rival_rate - brand_rate;
        candidates.push(QuerySuggestion {
            query: query.clone(),
            score: COMPETITOR_GAP_BASE + (gap / 2.0).min(COMPETITOR_GAP_MAX_BONUS),
            reason: format!(
                "{} appears in {rival_rate:.0}% of runs vs {brand} at {brand_rate:.0}%.",
                rival.name
            ),
            kind: SuggestionKind::CompetitorGap,
        });
    }

    let avg_position = running_position(history).mean();
    if brand_rate >= HIGH_PERFORMER_MIN_RATE
        && avg_position > 0.0
        && avg_position <= HIGH_PERFORMER_MAX_POSITION
    {
        let consistency_bonus = (brand_rate - HIGH_PERFORMER_MIN_RATE) / 4.0;
        let position_bonus = (4.0 - avg_position) * 3.33;
        candidates.push(QuerySuggestion {
            query: query.clone(),
            score: HIGH_PERFORMER_BASE + consistency_bonus + position_bonus,
            reason: format!(
                "{brand} appears in {brand_rate:.0}% of runs at an average position of \
                 {avg_position:.1}. Track it to protect the lead."
            ),
            kind: SuggestionKind::HighPerformer,
        });
    }

    candidates
}

/// Mean of each appearing run's best brand position, folded in run order.
fn running_position(history: &QueryHistory) -> OnlineMean {
    let mut mean = OnlineMean::default();
    for position in history.runs.iter().filter_map(|r| r.best_brand_position()) {
        mean.push(f64::from(position));
    }
    mean
}

/// Competitor with the most appearances; the first seen wins ties.
fn strongest(tallies: &[CompetitorTally]) -> Option<&CompetitorTally> {
    tallies.iter().fold(None, |best, t| match best {
        Some(b) if b.appearances >= t.appearances => Some(b),
        _ => Some(t),
    })
}

/// Insert `candidate`, keeping only the higher-scored entry per query.
fn keep_best(suggestions: &mut Vec<QuerySuggestion>, candidate: QuerySuggestion) {
    match suggestions.iter_mut().find(|s| s.query == candidate.query) {
        Some(existing) if existing.score < candidate.score => *existing = candidate,
        Some(_) => {}
        None => suggestions.push(candidate),
    }
}

fn by_score_desc(a: &QuerySuggestion, b: &QuerySuggestion) -> Ordering {
    b.score.total_cmp(&a.score)
}

#[cfg(test)]
#[path = "suggest_test.rs"]
mod tests;
