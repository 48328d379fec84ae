//! Conversion between collaborator outcomes, stored rows and mentions.

use geolens_core::{Mention, QueryOutcome, QueryResult};
use uuid::Uuid;

use crate::sanitize::{sanitize_mentions, BrandAllowList};

/// Turn one run's LLM outcomes into stored rows.
///
/// Each surviving mention becomes a row carrying the outcome's citations and
/// web-search flag. An outcome with no surviving mention still yields a
/// single marker row so the query counts as executed. Rows always use the
/// outcome's query text.
#[must_use]
pub fn results_from_outcomes(
    run_id: Uuid,
    outcomes: Vec<QueryOutcome>,
    allow: &BrandAllowList,
) -> Vec<QueryResult> {
    let mut rows = Vec::new();
    for outcome in outcomes {
        let mentions = sanitize_mentions(outcome.mentions, allow);
        if mentions.is_empty() {
            let mut marker = QueryResult::marker(run_id, outcome.query);
            marker.citations = outcome.citations;
            marker.used_web_search = outcome.used_web_search;
            rows.push(marker);
            continue;
        }
        for mention in mentions {
            let mut row = QueryResult::from_mention(
                run_id,
                Mention {
                    query: outcome.query.clone(),
                    ..mention
                },
            );
            row.citations.clone_from(&outcome.citations);
            row.used_web_search = outcome.used_web_search;
            rows.push(row);
        }
    }
    tracing::debug!(%run_id, rows = rows.len(), "converted query outcomes");
    rows
}

/// Brand rows of `results` as mentions, in row order. Marker rows and rows
/// without a position are skipped.
#[must_use]
pub fn mentions_from_results(results: &[QueryResult]) -> Vec<Mention> {
    results.iter().filter_map(QueryResult::to_mention).collect()
}
