use chrono::TimeZone;
use geolens_core::{ProjectConfig, QueryOutcome, RawMention};
use geolens_store::{HistoryStore, MemoryStore};
use uuid::Uuid;

use super::*;

fn project() -> ProjectConfig {
    ProjectConfig {
        id: Uuid::new_v4(),
        name: "Klio Tutoring".to_string(),
        brand: "Klio AI".to_string(),
        competitors: vec!["TutorPlus".to_string()],
        keywords: vec!["ai tutor".to_string()],
        tracked_queries: vec!["best AI tutor".to_string()],
    }
}

fn store_for(project: &ProjectConfig) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.register_project(project.id, project.tracked_queries.clone());
    store
}

fn outcome(query: &str, brands: &[(&str, i64)]) -> QueryOutcome {
    QueryOutcome {
        query: query.to_string(),
        response_text: String::new(),
        mentions: brands
            .iter()
            .map(|(brand, position)| RawMention {
                query: query.to_string(),
                brand: (*brand).to_string(),
                position: Some(*position),
                sentiment: Some("neutral".to_string()),
                context: None,
            })
            .collect(),
        citations: Vec::new(),
        used_web_search: false,
    }
}

#[test]
fn parses_dashboard_command() {
    let cli = Cli::try_parse_from(["geolens", "dashboard", "--project", "klio-tutoring"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Dashboard { project } if project == "klio-tutoring"
    ));
}

#[test]
fn parses_trend_command_with_query() {
    let cli = Cli::try_parse_from([
        "geolens",
        "trend",
        "--project",
        "klio-tutoring",
        "--query",
        "best AI tutor",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Trend { query, .. } if query == "best AI tutor"
    ));
}

#[test]
fn parses_ingest_run_at() {
    let cli = Cli::try_parse_from([
        "geolens",
        "ingest",
        "--project",
        "p",
        "--outcomes",
        "outcomes.json",
        "--run-at",
        "2026-03-02T09:30:00+01:00",
    ])
    .unwrap();
    let Commands::Ingest { run_at, .. } = cli.command else {
        panic!("expected ingest command");
    };
    assert_eq!(
        run_at,
        Some(Utc.with_ymd_and_hms(2026, 3, 2, 8, 30, 0).unwrap())
    );
}

#[test]
fn rejects_bad_run_at() {
    let result = Cli::try_parse_from([
        "geolens",
        "ingest",
        "--project",
        "p",
        "--outcomes",
        "o.json",
        "--run-at",
        "yesterday",
    ]);
    assert!(result.is_err());
}

#[test]
fn project_is_required() {
    assert!(Cli::try_parse_from(["geolens", "performance"]).is_err());
}

#[test]
fn ingest_then_report() {
    let project = project();
    let mut store = store_for(&project);
    let run_at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();

    let receipt = ingest::record(
        &project,
        &mut store,
        vec![
            outcome("best AI tutor", &[("klio ai", 2), ("TutorPlus", 1)]),
            outcome("AI tutor for kids", &[("Unknown", 1)]),
        ],
        run_at,
    )
    .unwrap();
    assert_eq!(receipt.rows, 3);
    assert_eq!(receipt.snapshot.total_queries, 2);
    assert_eq!(receipt.snapshot.brand_mentions, 1);
    assert_eq!(store.runs(project.id).unwrap().len(), 1);

    let summary = report::dashboard(&project, &store).unwrap();
    assert_eq!(summary.summary_card.brand_mentions, 1);
    assert_eq!(summary.gap_card[0].query, "AI tutor for kids");

    let performance = report::performance(&project, &store).unwrap();
    assert_eq!(performance[0].query, "best AI tutor");
    assert!(performance[0].is_tracked);

    let trend = report::trend(&project, &store, "best AI tutor").unwrap();
    assert_eq!(trend.runs.len(), 1);
    assert_eq!(trend.runs[0].position, Some(2));

    let suggestions = report::suggest(&project, &store, None).unwrap();
    assert!(suggestions.iter().all(|s| s.query != "best AI tutor"));
    assert_eq!(suggestions[0].query, "AI tutor for kids");
}

#[test]
fn suggest_without_history_uses_templates() {
    let project = project();
    let store = store_for(&project);
    let suggestions = report::suggest(&project, &store, None).unwrap();
    assert_eq!(suggestions[0].query, "top ai tutor tools");
    assert!((suggestions[0].score - 50.0).abs() < f64::EPSILON);
}
