use geolens_core::{Citation, Sentiment};

use super::*;
use crate::test_support::{hit, hit_with, miss, names, runs};

const BRAND: &str = "Klio AI";

fn perform(
    runs: &[AnalysisRun],
    results: &[QueryResult],
    tracked: &[String],
) -> Vec<QueryPerformance> {
    let competitors = names(&["TutorPlus", "MindCoach"]);
    aggregate_query_performance(&PerformanceInput {
        brand: BRAND,
        competitors: &competitors,
        runs,
        results,
        tracked,
    })
}

#[test]
fn worked_example_ten_runs_six_appearances() {
    let runs = runs(10);
    let positions = [1, 1, 2, 1, 3, 2];
    let mut results = Vec::new();
    for (i, run) in runs.iter().enumerate() {
        match positions.get(i) {
            Some(p) => results.push(hit(run, "best AI tutor", BRAND, *p)),
            None => results.push(miss(run, "best AI tutor")),
        }
    }
    let perf = perform(&runs, &results, &[]);
    assert_eq!(perf.len(), 1);
    let q = &perf[0];
    assert_eq!(q.total_runs, 10);
    assert_eq!(q.appearance_rate, 60);
    assert!((q.avg_position - 1.7).abs() < f64::EPSILON);
    assert_eq!(q.best_position, 1);
    assert_eq!(q.worst_position, 3);
    assert_eq!(q.trend_data, vec![1, 1, 1, 1, 1, 1, 0, 0, 0, 0]);
}

#[test]
fn trend_data_keeps_most_recent_ten_runs() {
    let runs = runs(12);
    let results: Vec<QueryResult> = runs
        .iter()
        .enumerate()
        .map(|(i, run)| {
            if i < 2 {
                miss(run, "q")
            } else {
                hit(run, "q", BRAND, 1)
            }
        })
        .collect();
    let perf = perform(&runs, &results, &[]);
    assert_eq!(perf[0].trend_data, vec![1; 10]);
    assert_eq!(perf[0].total_runs, 12);
}

#[test]
fn zero_appearance_queries_sort_last_in_original_order() {
    let runs = runs(2);
    let results = vec![
        miss(&runs[0], "never-a"),
        hit(&runs[0], "once", BRAND, 2),
        miss(&runs[0], "never-b"),
        hit(&runs[0], "twice", BRAND, 1),
        hit(&runs[1], "twice", BRAND, 1),
        hit(&runs[1], "never-c", "TutorPlus", 1),
    ];
    let perf = perform(&runs, &results, &[]);
    let order: Vec<&str> = perf.iter().map(|p| p.query.as_str()).collect();
    assert_eq!(order, vec!["twice", "once", "never-a", "never-b", "never-c"]);
}

#[test]
fn appearance_ties_break_on_rate() {
    let runs = runs(4);
    let results = vec![
        // two appearances over four runs: 50%
        hit(&runs[0], "wide", BRAND, 1),
        miss(&runs[1], "wide"),
        miss(&runs[2], "wide"),
        hit(&runs[3], "wide", BRAND, 1),
        // two appearances over two runs: 100%
        hit(&runs[2], "narrow", BRAND, 1),
        hit(&runs[3], "narrow", BRAND, 1),
    ];
    let perf = perform(&runs, &results, &[]);
    assert_eq!(perf[0].query, "narrow");
    assert_eq!(perf[0].appearance_rate, 100);
    assert_eq!(perf[1].query, "wide");
    assert_eq!(perf[1].appearance_rate, 50);
}

#[test]
fn tracked_but_never_run_queries_are_appended_with_zero_stats() {
    let runs = runs(1);
    let results = vec![miss(&runs[0], "analyzed"), hit(&runs[0], "hit", BRAND, 1)];
    let tracked = names(&["hit", "not yet run"]);
    let perf = perform(&runs, &results, &tracked);
    let last = perf.last().unwrap();
    assert_eq!(last.query, "not yet run");
    assert!(last.is_tracked);
    assert_eq!(last.total_runs, 0);
    assert_eq!(last.appearance_rate, 0);
    assert!(last.avg_position.abs() < f64::EPSILON);
    assert_eq!(last.best_position, 0);
    assert_eq!(last.worst_position, 0);
    assert!(last.trend_data.is_empty());
    assert!(perf[0].is_tracked);
    assert!(!perf[1].is_tracked);
}

#[test]
fn competitor_stats_and_sentiment() {
    let runs = runs(2);
    let results = vec![
        hit_with(&runs[0], "q", BRAND, 2, Sentiment::Positive),
        hit(&runs[0], "q", "TutorPlus", 1),
        hit_with(&runs[1], "q", BRAND, 1, Sentiment::Negative),
        hit(&runs[1], "q", "TutorPlus", 2),
        hit(&runs[1], "q", "MindCoach", 4),
    ];
    let perf = perform(&runs, &results, &[]);
    let q = &perf[0];
    assert_eq!(q.sentiment.positive, 1);
    assert_eq!(q.sentiment.negative, 1);
    assert_eq!(q.competitors["TutorPlus"].appearances, 2);
    assert!((q.competitors["TutorPlus"].avg_position - 1.5).abs() < f64::EPSILON);
    assert_eq!(q.competitors["MindCoach"].appearances, 1);
    assert!(!q.competitors.contains_key("Nobody"));
}

#[test]
fn citations_and_web_search_flow_through() {
    let runs = runs(2);
    let mut with_citation = miss(&runs[1], "q");
    with_citation.citations = vec![Citation {
        url: "https://example.com/review".to_string(),
        title: Some("Review".to_string()),
    }];
    with_citation.used_web_search = true;
    let results = vec![miss(&runs[0], "q"), with_citation];
    let perf = perform(&runs, &results, &[]);
    assert_eq!(perf[0].citations.len(), 1);
    assert!(perf[0].used_web_search);
}

#[test]
fn serializes_camel_case() {
    let runs = runs(1);
    let perf = perform(&runs, &[hit(&runs[0], "q", BRAND, 1)], &[]);
    let json = serde_json::to_value(&perf[0]).unwrap();
    assert!(json.get("appearanceRate").is_some());
    assert!(json.get("trendData").is_some());
    assert!(json.get("usedWebSearch").is_some());
}
