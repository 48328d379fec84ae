//! Rule cascade turning gaps, trend and share of voice into next steps.

use crate::gaps::{Gap, GapKind};

pub const MAX_ACTIONS: usize = 4;

/// Share of voice below which the brand is told to widen coverage.
const SHARE_OF_VOICE_TARGET: u32 = 40;

/// Trend moves within this many points either way are treated as flat.
const TREND_THRESHOLD: i64 = 2;

const DEFAULT_ACTION: &str = "Maintain momentum: visibility is healthy across tracked queries. \
     Keep publishing fresh, authoritative content and keep an eye on competitors.";

#[derive(Debug, Clone, Copy)]
pub struct ActionInputs<'a> {
    pub brand: &'a str,
    /// Detected gaps in tier order, as shown on the gap card.
    pub gaps: &'a [Gap],
    pub trend_delta: i64,
    /// Brand share of voice in percent.
    pub brand_share: u32,
}

/// Produce at most [`MAX_ACTIONS`] recommendations in rule order.
///
/// Rules, earliest first: zero-visibility gaps, the competitor dominating the
/// most missing-with-competitor gaps, trend decline or momentum, low share of
/// voice, the first outranked gap. When none fire, a single default action.
#[must_use]
pub fn recommend_actions(inputs: &ActionInputs<'_>) -> Vec<String> {
    let mut actions: Vec<String> = Vec::new();
    let mut push = |action: String| {
        if actions.len() < MAX_ACTIONS {
            actions.push(action);
        }
    };

    let zero: Vec<&Gap> = of_kind(inputs.gaps, GapKind::ZeroVisibility);
    if let Some(first) = zero.first() {
        push(format!(
            "Critical: {} with zero AI visibility, starting with \"{}\". \
             Publish content that answers these questions directly.",
            plural_queries(zero.len()),
            first.query
        ));
    }

    let missing = of_kind(inputs.gaps, GapKind::MissingWithCompetitor);
    if let Some((competitor, count, example)) = top_dominator(&missing) {
        push(format!(
            "Counter {competitor}: it is cited where {} is missing on {} (e.g. \"{example}\"). \
             Publish comparison and alternatives content.",
            inputs.brand,
            plural_queries(count)
        ));
    }

    if inputs.trend_delta < -TREND_THRESHOLD {
        push(format!(
            "Decline alert: visibility fell by {} since the previous run. \
             Review which queries dropped and refresh that content.",
            inputs.trend_delta.unsigned_abs()
        ));
    } else if inputs.trend_delta > TREND_THRESHOLD {
        push(format!(
            "Momentum: visibility rose by {} since the previous run. \
             Double down on the content driving it.",
            inputs.trend_delta
        ));
    }

    if inputs.brand_share < SHARE_OF_VOICE_TARGET {
        push(format!(
            "Raise share of voice: {} appears in {}% of tracked queries. \
             Aim for at least {SHARE_OF_VOICE_TARGET}% by expanding topical coverage.",
            inputs.brand, inputs.brand_share
        ));
    }

    if let Some(gap) = of_kind(inputs.gaps, GapKind::Outranked).first() {
        push(format!("Close the ranking gap: {}", gap.recommendation));
    }

    if actions.is_empty() {
        actions.push(DEFAULT_ACTION.to_string());
    }
    actions
}

fn of_kind(gaps: &[Gap], kind: GapKind) -> Vec<&Gap> {
    gaps.iter().filter(|g| g.kind == kind).collect()
}

/// Competitor dominating the most gaps, its gap count and its first query.
/// Ties go to the competitor seen first.
fn top_dominator<'a>(gaps: &[&'a Gap]) -> Option<(&'a str, usize, &'a str)> {
    let mut counts: Vec<(&'a str, usize, &'a str)> = Vec::new();
    for gap in gaps {
        let name = gap.dominating_competitor.as_str();
        match counts.iter_mut().find(|(n, _, _)| *n == name) {
            Some((_, count, _)) => *count += 1,
            None => counts.push((name, 1, gap.query.as_str())),
        }
    }
    counts
        .into_iter()
        .fold(None, |best, candidate| match best {
            Some((_, top, _)) if top >= candidate.1 => best,
            _ => Some(candidate),
        })
}

fn plural_queries(n: usize) -> String {
    if n == 1 {
        "1 query".to_string()
    } else {
        format!("{n} queries")
    }
}

#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;
