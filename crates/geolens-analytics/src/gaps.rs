//! Visibility gap classification per query.

use std::collections::HashSet;

use geolens_core::{brand_key, Mention};
use serde::Serialize;

pub const MAX_GAPS: usize = 5;

/// Placeholder competitor name for queries where nobody is cited.
pub const NO_COMPETITOR: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    /// Neither the brand nor any competitor appears.
    ZeroVisibility,
    /// The brand is absent while at least one competitor appears.
    MissingWithCompetitor,
    /// The brand appears but a competitor holds a better position.
    Outranked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gap {
    pub query: String,
    pub kind: GapKind,
    pub dominating_competitor: String,
    pub brand_position: Option<u32>,
    pub competitor_position: Option<u32>,
    pub recommendation: String,
}

/// Every gap across `universe` and the queries present in `mentions`, ordered
/// zero-visibility, then missing-with-competitor, then outranked.
///
/// Within a tier, queries keep the order they were encountered: universe
/// entries first, then queries first seen in `mentions`.
#[must_use]
pub fn classify_gaps(
    brand: &str,
    competitors: &[String],
    mentions: &[Mention],
    universe: &[String],
) -> Vec<Gap> {
    let brand_k = brand_key(brand);
    let competitor_keys: Vec<String> = competitors.iter().map(|c| brand_key(c)).collect();

    let mut zero = Vec::new();
    let mut missing = Vec::new();
    let mut outranked = Vec::new();

    for query in query_order(mentions, universe) {
        let mut brand_best: Option<u32> = None;
        // (competitor, best position) in encounter order
        let mut rivals: Vec<(&str, u32)> = Vec::new();

        for m in mentions.iter().filter(|m| m.query == query) {
            let key = brand_key(&m.brand);
            if key == brand_k {
                brand_best = Some(brand_best.map_or(m.position, |b| b.min(m.position)));
            } else if let Some(idx) = competitor_keys.iter().position(|c| *c == key) {
                let name = competitors[idx].as_str();
                match rivals.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, best)) => *best = (*best).min(m.position),
                    None => rivals.push((name, m.position)),
                }
            }
        }

        match brand_best {
            None if rivals.is_empty() => zero.push(Gap {
                recommendation: format!(
                    "Zero brand visibility: no tracked brand is cited for \"{query}\". \
                     Publish content that answers it directly."
                ),
                query: query.to_string(),
                kind: GapKind::ZeroVisibility,
                dominating_competitor: NO_COMPETITOR.to_string(),
                brand_position: None,
                competitor_position: None,
            }),
            None => {
                let (rival, position) = best_rival(&rivals, u32::MAX);
                missing.push(Gap {
                    recommendation: format!(
                        "{rival} ranks #{position} for \"{query}\" while {brand} is not mentioned. \
                         Create content targeting this query."
                    ),
                    query: query.to_string(),
                    kind: GapKind::MissingWithCompetitor,
                    dominating_competitor: rival.to_string(),
                    brand_position: None,
                    competitor_position: Some(position),
                });
            }
            Some(own) => {
                if rivals.iter().any(|(_, p)| *p < own) {
                    let (rival, position) = best_rival(&rivals, own);
                    outranked.push(Gap {
                        recommendation: format!(
                            "{rival} ranks #{position} vs {brand} at #{own} for \"{query}\". \
                             Strengthen comparison content to move up."
                        ),
                        query: query.to_string(),
                        kind: GapKind::Outranked,
                        dominating_competitor: rival.to_string(),
                        brand_position: Some(own),
                        competitor_position: Some(position),
                    });
                }
            }
        }
    }

    zero.into_iter().chain(missing).chain(outranked).collect()
}

/// [`classify_gaps`] truncated to the first [`MAX_GAPS`].
#[must_use]
pub fn detect_gaps(
    brand: &str,
    competitors: &[String],
    mentions: &[Mention],
    universe: &[String],
) -> Vec<Gap> {
    let mut gaps = classify_gaps(brand, competitors, mentions, universe);
    gaps.truncate(MAX_GAPS);
    gaps
}

/// Best-positioned rival strictly below `ceiling`; the first one wins ties.
fn best_rival<'a>(rivals: &[(&'a str, u32)], ceiling: u32) -> (&'a str, u32) {
    rivals
        .iter()
        .filter(|(_, p)| *p < ceiling)
        .fold(None, |best: Option<(&'a str, u32)>, &(name, p)| match best {
            Some((_, b)) if b <= p => best,
            _ => Some((name, p)),
        })
        .unwrap_or((NO_COMPETITOR, 0))
}

fn query_order<'a>(mentions: &'a [Mention], universe: &'a [String]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    universe
        .iter()
        .map(String::as_str)
        .chain(mentions.iter().map(|m| m.query.as_str()))
        .filter(|q| seen.insert(*q))
        .collect()
}

#[cfg(test)]
#[path = "gaps_test.rs"]
mod tests;
