//! Dashboard payload: share of voice, trend, gaps, actions and sentiment.
//!
//! Recomputed from scratch on every read; nothing here is persisted.

use std::collections::{BTreeMap, HashSet};

use geolens_core::{brand_key, Mention, ProjectSnapshot};
use serde::Serialize;

use crate::actions::{recommend_actions, ActionInputs};
use crate::gaps::{detect_gaps, Gap};
use crate::stats::{percent, round_non_negative, SentimentCounts};

/// Number of most recent snapshots plotted on the trend card.
pub const TREND_POINTS: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct DashboardInput<'a> {
    pub brand: &'a str,
    pub competitors: &'a [String],
    /// Sanitized mentions across every run.
    pub mentions: &'a [Mention],
    pub snapshots: &'a [ProjectSnapshot],
    /// Queries to check for gaps. Defaults to every snapshot's analyzed queries.
    pub query_universe: Option<&'a [String]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub summary_card: SummaryCard,
    pub trend_card: TrendCard,
    pub gap_card: Vec<Gap>,
    pub action_card: Vec<String>,
    pub sentiment_card: SentimentCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCard {
    /// Distinct queries the brand appears in, not raw mention count.
    pub brand_mentions: u32,
    /// Sum of `total_queries` over every snapshot.
    pub total_queries: u32,
    /// Percent per brand and competitor. Denominators are shared, so values
    /// are independent and need not sum to 100.
    pub share_of_voice: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendCard {
    pub series: Vec<TrendPoint>,
    /// Last value minus the one before it, `0` with fewer than two points.
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub week: String,
    pub value: u32,
    /// Brand value plus competitors reconstructed from their stored share.
    #[serde(flatten)]
    pub brands: BTreeMap<String, u32>,
}

#[must_use]
pub fn build_dashboard_summary(input: &DashboardInput<'_>) -> DashboardSummary {
    let total_queries: u32 = input.snapshots.iter().map(|s| s.total_queries).sum();
    let brand_mentions = distinct_queries_with(input.mentions, input.brand);

    let mut share_of_voice = BTreeMap::new();
    for name in std::iter::once(input.brand).chain(input.competitors.iter().map(String::as_str)) {
        let appeared = distinct_queries_with(input.mentions, name);
        share_of_voice.insert(name.to_string(), share(appeared, total_queries));
    }
    let brand_share = share(brand_mentions, total_queries);

    let trend_card = build_trend_card(input.brand, input.competitors, input.snapshots);

    let universe = input
        .query_universe
        .map_or_else(|| snapshot_queries(input.snapshots), <[String]>::to_vec);
    let gap_card = detect_gaps(input.brand, input.competitors, input.mentions, &universe);
    let action_card = recommend_actions(&ActionInputs {
        brand: input.brand,
        gaps: &gap_card,
        trend_delta: trend_card.delta,
        brand_share,
    });

    let brand_k = brand_key(input.brand);
    let sentiment_card = input
        .mentions
        .iter()
        .filter(|m| brand_key(&m.brand) == brand_k)
        .map(|m| m.sentiment)
        .collect();

    tracing::debug!(
        brand = input.brand,
        total_queries,
        brand_mentions,
        gaps = gap_card.len(),
        actions = action_card.len(),
        "built dashboard summary"
    );

    DashboardSummary {
        summary_card: SummaryCard {
            brand_mentions,
            total_queries,
            share_of_voice,
        },
        trend_card,
        gap_card,
        action_card,
        sentiment_card,
    }
}

/// Trend series over the most recent [`TREND_POINTS`] snapshots, oldest first.
///
/// Competitor values are `round(share / 100 * total_queries)` from the stored
/// percentage, which is lossy by construction.
#[must_use]
pub fn build_trend_card(
    brand: &str,
    competitors: &[String],
    snapshots: &[ProjectSnapshot],
) -> TrendCard {
    let mut ordered: Vec<&ProjectSnapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|s| s.snapshot_date);
    let recent = &ordered[ordered.len().saturating_sub(TREND_POINTS)..];

    let series: Vec<TrendPoint> = recent
        .iter()
        .map(|snapshot| {
            let mut brands = BTreeMap::new();
            brands.insert(brand.to_string(), snapshot.brand_mentions);
            for competitor in competitors {
                let pct = competitor_share(snapshot, competitor);
                let value =
                    round_non_negative(f64::from(pct) / 100.0 * f64::from(snapshot.total_queries));
                brands.insert(competitor.clone(), value);
            }
            TrendPoint {
                week: snapshot.snapshot_date.format("%b %-d").to_string(),
                value: snapshot.brand_mentions,
                brands,
            }
        })
        .collect();

    let delta = match series.as_slice() {
        [.., previous, last] => i64::from(last.value) - i64::from(previous.value),
        _ => 0,
    };

    TrendCard { series, delta }
}

fn competitor_share(snapshot: &ProjectSnapshot, competitor: &str) -> u32 {
    if let Some(pct) = snapshot.competitor_shares.get(competitor) {
        return *pct;
    }
    let key = brand_key(competitor);
    snapshot
        .competitor_shares
        .iter()
        .find(|(name, _)| brand_key(name) == key)
        .map_or(0, |(_, pct)| *pct)
}

fn distinct_queries_with(mentions: &[Mention], name: &str) -> u32 {
    let key = brand_key(name);
    let queries: HashSet<&str> = mentions
        .iter()
        .filter(|m| brand_key(&m.brand) == key)
        .map(|m| m.query.as_str())
        .collect();
    u32::try_from(queries.len()).unwrap_or(u32::MAX)
}

fn share(appeared: u32, total_queries: u32) -> u32 {
    percent(appeared as usize, total_queries as usize).min(100)
}

/// Union of analyzed queries across snapshots, first-seen order.
fn snapshot_queries(snapshots: &[ProjectSnapshot]) -> Vec<String> {
    let mut seen = HashSet::new();
    snapshots
        .iter()
        .flat_map(|s| s.analyzed_queries.iter())
        .filter(|q| seen.insert(q.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
