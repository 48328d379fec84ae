//! Fixture builders shared by unit tests.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use geolens_core::{AnalysisRun, Mention, ProjectSnapshot, QueryResult, Sentiment};
use uuid::Uuid;

pub(crate) fn project_id() -> Uuid {
    Uuid::from_u128(0x6f1c_1b0e_8a4b_4c1e_9a59_1f2d_3c4b_5a69)
}

/// `n` runs one day apart, oldest first.
pub(crate) fn runs(n: usize) -> Vec<AnalysisRun> {
    let start = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
    (0..n)
        .map(|i| AnalysisRun {
            id: Uuid::from_u128(1000 + i as u128),
            project_id: project_id(),
            run_at: start + Duration::days(i64::try_from(i).unwrap()),
            queries_generated: 3,
        })
        .collect()
}

pub(crate) fn hit(run: &AnalysisRun, query: &str, brand: &str, position: u32) -> QueryResult {
    QueryResult {
        run_id: run.id,
        query_text: query.to_string(),
        brand: Some(brand.to_string()),
        position: Some(position),
        sentiment: Some(Sentiment::Neutral),
        context: Some(format!("{brand} was mentioned")),
        citations: Vec::new(),
        used_web_search: false,
    }
}

pub(crate) fn hit_with(
    run: &AnalysisRun,
    query: &str,
    brand: &str,
    position: u32,
    sentiment: Sentiment,
) -> QueryResult {
    QueryResult {
        sentiment: Some(sentiment),
        ..hit(run, query, brand, position)
    }
}

pub(crate) fn miss(run: &AnalysisRun, query: &str) -> QueryResult {
    QueryResult::marker(run.id, query)
}

pub(crate) fn mention(query: &str, brand: &str, position: u32, sentiment: Sentiment) -> Mention {
    Mention {
        query: query.to_string(),
        brand: brand.to_string(),
        position,
        sentiment,
        context: String::new(),
    }
}

pub(crate) fn snapshot(day: u32, total_queries: u32, brand_mentions: u32) -> ProjectSnapshot {
    ProjectSnapshot {
        project_id: project_id(),
        run_id: Uuid::from_u128(2000 + u128::from(day)),
        snapshot_date: NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
        total_queries,
        queries_with_mentions: brand_mentions,
        brand_mentions,
        brand_share_pct: 0,
        competitor_shares: std::collections::BTreeMap::new(),
        analyzed_queries: Vec::new(),
    }
}

pub(crate) fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}
