//! Reshaping of flat per-run query results into per-query history.
//!
//! Every run-spanning read model (performance, trend, suggestions) starts
//! from [`aggregate_runs`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use geolens_core::{brand_key, AnalysisRun, Citation, QueryResult, Sentiment};
use uuid::Uuid;

use crate::stats::SentimentCounts;

/// What one run recorded for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRun {
    pub run_id: Uuid,
    /// `None` when the row references a run missing from the run list.
    pub run_at: Option<DateTime<Utc>>,
    /// Number of rows naming the brand in this run.
    pub brand_rows: usize,
    pub brand_positions: Vec<u32>,
    pub brand_sentiments: Vec<Sentiment>,
    /// Context of the first brand row.
    pub brand_context: Option<String>,
    /// Best position per competitor that appeared, in encounter order.
    pub competitor_positions: Vec<(String, Option<u32>)>,
}

impl QueryRun {
    fn new(run_id: Uuid, run_at: Option<DateTime<Utc>>) -> Self {
        Self {
            run_id,
            run_at,
            brand_rows: 0,
            brand_positions: Vec::new(),
            brand_sentiments: Vec::new(),
            brand_context: None,
            competitor_positions: Vec::new(),
        }
    }

    #[must_use]
    pub fn brand_appeared(&self) -> bool {
        self.brand_rows > 0
    }

    /// Best (lowest) brand position in this run.
    #[must_use]
    pub fn best_brand_position(&self) -> Option<u32> {
        self.brand_positions.iter().copied().min()
    }

    #[must_use]
    pub fn competitor_position(&self, competitor: &str) -> Option<Option<u32>> {
        self.competitor_positions
            .iter()
            .find(|(name, _)| name == competitor)
            .map(|(_, pos)| *pos)
    }

    fn record_competitor(&mut self, name: &str, position: Option<u32>) {
        match self
            .competitor_positions
            .iter_mut()
            .find(|(existing, _)| existing == name)
        {
            Some((_, best)) => {
                *best = match (*best, position) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            }
            None => self.competitor_positions.push((name.to_string(), position)),
        }
    }
}

/// Cross-run tally for one competitor on one query.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorTally {
    pub name: String,
    /// Runs in which the competitor appeared.
    pub appearances: usize,
    /// Best position per appearing run, nulls excluded.
    pub positions: Vec<u32>,
}

/// Every run that touched one query, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHistory {
    pub query: String,
    pub runs: Vec<QueryRun>,
    pub is_tracked: bool,
    /// Citations of the first row carrying any.
    pub citations: Vec<Citation>,
    pub used_web_search: bool,
}

impl QueryHistory {
    fn empty(query: &str, is_tracked: bool) -> Self {
        Self {
            query: query.to_string(),
            runs: Vec::new(),
            is_tracked,
            citations: Vec::new(),
            used_web_search: false,
        }
    }

    #[must_use]
    pub fn total_runs(&self) -> usize {
        self.runs.len()
    }

    #[must_use]
    pub fn runs_with_brand(&self) -> usize {
        self.runs.iter().filter(|r| r.brand_appeared()).count()
    }

    /// Raw number of brand rows across all runs.
    #[must_use]
    pub fn brand_mentions(&self) -> usize {
        self.runs.iter().map(|r| r.brand_rows).sum()
    }

    /// Per-run brand-appeared flags, oldest to newest.
    #[must_use]
    pub fn appearance_sequence(&self) -> Vec<bool> {
        self.runs.iter().map(QueryRun::brand_appeared).collect()
    }

    #[must_use]
    pub fn brand_positions(&self) -> Vec<u32> {
        self.runs
            .iter()
            .flat_map(|r| r.brand_positions.iter().copied())
            .collect()
    }

    #[must_use]
    pub fn sentiment(&self) -> SentimentCounts {
        self.runs
            .iter()
            .flat_map(|r| r.brand_sentiments.iter().copied())
            .collect()
    }

    /// Competitor tallies in the order competitors were first seen.
    #[must_use]
    pub fn competitor_tallies(&self) -> Vec<CompetitorTally> {
        let mut tallies: Vec<CompetitorTally> = Vec::new();
        for run in &self.runs {
            for (name, position) in &run.competitor_positions {
                let idx = if let Some(idx) = tallies.iter().position(|t| &t.name == name) {
                    idx
                } else {
                    tallies.push(CompetitorTally {
                        name: name.clone(),
                        appearances: 0,
                        positions: Vec::new(),
                    });
                    tallies.len() - 1
                };
                let tally = &mut tallies[idx];
                tally.appearances += 1;
                if let Some(p) = position {
                    tally.positions.push(*p);
                }
            }
        }
        tallies
    }
}

/// Group `results` by query text across `runs`.
///
/// Runs are ordered by `run_at` (ties keep input order); rows whose run is
/// not in `runs` sort after every known run, in first-seen order. Queries
/// appear in the order they were first encountered along that timeline,
/// followed by tracked queries that no run touched (all-zero history).
/// Null-brand marker rows register the run but add no appearance. Rows
/// naming neither the brand nor a configured competitor are ignored beyond
/// that.
#[must_use]
pub fn aggregate_runs(
    runs: &[AnalysisRun],
    results: &[QueryResult],
    brand: &str,
    competitors: &[String],
    tracked: &[String],
) -> Vec<QueryHistory> {
    let timeline = RunTimeline::new(runs, results);
    let brand = brand_key(brand);
    let competitor_names: HashMap<String, &str> = competitors
        .iter()
        .map(|c| (brand_key(c), c.as_str()))
        .collect();
    let tracked_set: HashSet<&str> = tracked.iter().map(String::as_str).collect();

    let mut rows: Vec<(usize, usize, &QueryResult)> = results
        .iter()
        .enumerate()
        .map(|(idx, row)| (timeline.rank(row.run_id), idx, row))
        .collect();
    rows.sort_by_key(|(rank, idx, _)| (*rank, *idx));

    let mut histories: Vec<QueryHistory> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (_, _, row) in rows {
        let slot = *index.entry(row.query_text.as_str()).or_insert_with(|| {
            histories.push(QueryHistory::empty(
                &row.query_text,
                tracked_set.contains(row.query_text.as_str()),
            ));
            histories.len() - 1
        });
        let history = &mut histories[slot];

        if history.citations.is_empty() && !row.citations.is_empty() {
            history.citations = row.citations.clone();
        }
        history.used_web_search |= row.used_web_search;

        let run = match history.runs.iter().position(|r| r.run_id == row.run_id) {
            Some(pos) => &mut history.runs[pos],
            None => {
                history
                    .runs
                    .push(QueryRun::new(row.run_id, timeline.run_at(row.run_id)));
                let last = history.runs.len() - 1;
                &mut history.runs[last]
            }
        };

        let Some(name) = row.brand.as_deref() else {
            continue;
        };
        let key = brand_key(name);
        if key == brand {
            run.brand_rows += 1;
            if let Some(p) = row.position {
                run.brand_positions.push(p);
            }
            run.brand_sentiments.push(row.sentiment.unwrap_or_default());
            if run.brand_context.is_none() {
                run.brand_context.clone_from(&row.context);
            }
        } else if let Some(canonical) = competitor_names.get(&key) {
            run.record_competitor(canonical, row.position);
        }
    }

    let mut seen_tracked: HashSet<&str> = HashSet::new();
    for query in tracked {
        if !index.contains_key(query.as_str()) && seen_tracked.insert(query.as_str()) {
            histories.push(QueryHistory::empty(query, true));
        }
    }

    histories
}

/// Chronological rank of each run id.
struct RunTimeline {
    ranks: HashMap<Uuid, (usize, Option<DateTime<Utc>>)>,
}

impl RunTimeline {
    fn new(runs: &[AnalysisRun], results: &[QueryResult]) -> Self {
        let mut ordered: Vec<(usize, &AnalysisRun)> = runs.iter().enumerate().collect();
        ordered.sort_by_key(|(idx, run)| (run.run_at, *idx));

        let mut ranks = HashMap::new();
        for (run, rank) in ordered.iter().map(|(_, r)| *r).zip(0..) {
            ranks.entry(run.id).or_insert((rank, Some(run.run_at)));
        }
        let mut next = ordered.len();
        for row in results {
            ranks.entry(row.run_id).or_insert_with(|| {
                next += 1;
                (next - 1, None)
            });
        }
        Self { ranks }
    }

    fn rank(&self, run_id: Uuid) -> usize {
        self.ranks.get(&run_id).map_or(usize::MAX, |(rank, _)| *rank)
    }

    fn run_at(&self, run_id: Uuid) -> Option<DateTime<Utc>> {
        self.ranks.get(&run_id).and_then(|(_, at)| *at)
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
